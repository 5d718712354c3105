// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime configuration of a [`Kit`](crate::Kit).

use core::fmt;

use stipple_raster::{GpuContext, GpuError, SurfaceOptions};

/// Creates the GPU context on the first GPU surface request.
pub type GpuContextFactory = Box<dyn FnOnce() -> Result<GpuContext, GpuError>>;

/// Knobs applied by a [`Kit`](crate::Kit).
#[derive(Default)]
pub struct KitConfig {
    /// Rasterizer settings for every new surface.
    pub surface: SurfaceOptions,
    /// Source of the GPU context. Without one, GPU surface requests fail.
    pub gpu: Option<GpuContextFactory>,
}

impl fmt::Debug for KitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KitConfig")
            .field("surface", &self.surface)
            .field("gpu", &self.gpu.is_some())
            .finish()
    }
}

impl KitConfig {
    /// Use `factory` to create the GPU context when one is first needed.
    pub fn with_gpu(
        mut self,
        factory: impl FnOnce() -> Result<GpuContext, GpuError> + 'static,
    ) -> Self {
        self.gpu = Some(Box::new(factory));
        self
    }
}
