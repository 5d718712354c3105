// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host GPU devices and the explicit context that wraps one.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::GpuError;

/// Identifier of a render target allocated by a [`GpuDevice`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GpuTarget(pub u64);

/// A host-provided GPU device.
///
/// Surfaces always rasterize on the CPU into premultiplied RGBA8; a device
/// only owns render targets and receives finished frames.
pub trait GpuDevice {
    /// Allocate a render target of the given size.
    fn create_target(&mut self, width: u16, height: u16) -> Result<GpuTarget, GpuError>;

    /// Upload a frame of tightly packed premultiplied RGBA8 pixels.
    fn present(
        &mut self,
        target: GpuTarget,
        width: u16,
        height: u16,
        pixels: &[u8],
    ) -> Result<(), GpuError>;

    /// Release a render target. The default does nothing.
    fn release_target(&mut self, target: GpuTarget) {
        let _ = target;
    }
}

/// A rendering context shared by every GPU-backed surface created from it.
///
/// Clones share the same device.
#[derive(Clone)]
pub struct GpuContext {
    device: Rc<RefCell<dyn GpuDevice>>,
}

impl fmt::Debug for GpuContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuContext").finish_non_exhaustive()
    }
}

impl GpuContext {
    /// Wrap a device.
    pub fn new(device: impl GpuDevice + 'static) -> Self {
        let device: Rc<RefCell<dyn GpuDevice>> = Rc::new(RefCell::new(device));
        log::debug!("gpu context initialized");
        Self { device }
    }

    pub(crate) fn create_target(&self, width: u16, height: u16) -> Result<GpuTarget, GpuError> {
        self.device.borrow_mut().create_target(width, height)
    }

    pub(crate) fn present(
        &self,
        target: GpuTarget,
        width: u16,
        height: u16,
        pixels: &[u8],
    ) -> Result<(), GpuError> {
        self.device
            .borrow_mut()
            .present(target, width, height, pixels)
    }

    pub(crate) fn release_target(&self, target: GpuTarget) {
        self.device.borrow_mut().release_target(target);
    }
}
