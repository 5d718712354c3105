// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Images and byte blobs.

use std::sync::Arc;

use stipple_imaging::ImageFormat;
use stipple_raster::Image;

use super::{Kit, decode};
use crate::{Handle, KitError};

impl Kit {
    /// Decode a PNG stream into an image.
    pub fn make_image_from_encoded(&mut self, bytes: &[u8]) -> Handle {
        self.call("MakeImageFromEncoded", |kit| {
            let image = Image::decode(bytes)?;
            kit.images.insert(Arc::new(image))
        })
    }

    /// An image from tightly packed RGBA8 pixels.
    ///
    /// With `premultiplied` unset the pixels are premultiplied on the way in.
    pub fn make_image_raster(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
        premultiplied: bool,
    ) -> Handle {
        self.call("MakeImage", |kit| {
            let image = if premultiplied {
                Image::from_premul_rgba8(width, height, pixels.to_vec())?
            } else {
                Image::from_rgba8_unpremul(width, height, pixels)?
            };
            kit.images.insert(Arc::new(image))
        })
    }

    /// Width in pixels.
    pub fn image_width(&mut self, image: Handle) -> u32 {
        self.call("Image_width", |kit| Ok(kit.images.get(image)?.width()))
    }

    /// Height in pixels.
    pub fn image_height(&mut self, image: Handle) -> u32 {
        self.call("Image_height", |kit| Ok(kit.images.get(image)?.height()))
    }

    /// Copy a region as premultiplied RGBA8 with stride `row_bytes`.
    pub fn image_read_pixels(
        &mut self,
        image: Handle,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        dst: &mut [u8],
        row_bytes: usize,
    ) -> bool {
        self.call("Image_readPixels", |kit| {
            kit.images
                .get(image)?
                .read_pixels_rgba8888(x, y, width, height, dst, row_bytes)?;
            Ok(true)
        })
    }

    /// The image encoded into a data object.
    pub fn image_encode(&mut self, image: Handle, format: u32) -> Handle {
        self.call("Image_encodeToData", |kit| {
            let format = decode("image format", format, ImageFormat::from_code)?;
            let bytes = kit.images.get(image)?.encode(format)?;
            kit.data.insert(bytes.into())
        })
    }

    /// A new image holding a copy of a region.
    pub fn image_subset(
        &mut self,
        image: Handle,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Handle {
        self.call("Image_makeSubset", |kit| {
            let subset = kit.images.get(image)?.subset(x, y, width, height)?;
            kit.images.insert(Arc::new(subset))
        })
    }

    /// A data object holding a copy of `bytes`. Empty input is rejected.
    pub fn make_data(&mut self, bytes: &[u8]) -> Handle {
        self.call("MakeData", |kit| {
            if bytes.is_empty() {
                return Err(KitError::InvalidInput("data is empty"));
            }
            kit.data.insert(bytes.into())
        })
    }

    /// Length of a data object in bytes.
    pub fn data_size(&mut self, data: Handle) -> usize {
        self.call("Data_size", |kit| Ok(kit.data.get(data)?.len()))
    }

    /// Copy as much of a data object as fits into `dst`. Returns the number
    /// of bytes copied.
    pub fn data_copy(&mut self, data: Handle, dst: &mut [u8]) -> usize {
        self.call("Data_copy", |kit| {
            let bytes = kit.data.get(data)?;
            let n = bytes.len().min(dst.len());
            dst[..n].copy_from_slice(&bytes[..n]);
            Ok(n)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trip_through_data() {
        let mut kit = Kit::default();
        let pixels = [255, 0, 0, 255, 0, 0, 128, 128];
        let image = kit.make_image_raster(2, 1, &pixels, true);
        let png = kit.image_encode(image, 0);
        let mut bytes = vec![0; kit.data_size(png)];
        assert_eq!(kit.data_copy(png, &mut bytes), bytes.len());
        let decoded = kit.make_image_from_encoded(&bytes);
        let mut out = [0; 8];
        assert!(kit.image_read_pixels(decoded, 0, 0, 2, 1, &mut out, 8), "read");
        assert_eq!(out[..4], [255, 0, 0, 255]);
        assert_eq!(out[7], 128);
    }

    #[test]
    fn subsets_are_new_images() {
        let mut kit = Kit::default();
        let pixels: Vec<u8> = (0..4).flat_map(|i| [i * 60, 0, 0, 255]).collect();
        let image = kit.make_image_raster(2, 2, &pixels, true);
        let corner = kit.image_subset(image, 1, 1, 1, 1);
        assert_ne!(corner, image);
        let mut px = [0; 4];
        assert!(kit.image_read_pixels(corner, 0, 0, 1, 1, &mut px, 4), "read");
        assert_eq!(px, [180, 0, 0, 255]);
        assert_eq!(kit.image_subset(image, 1, 1, 2, 2), Handle::NULL, "out of bounds");
    }

    #[test]
    fn bad_inputs_give_null() {
        let mut kit = Kit::default();
        assert_eq!(kit.make_image_from_encoded(&[]), Handle::NULL);
        assert_eq!(kit.make_image_from_encoded(b"not a png"), Handle::NULL);
        assert_eq!(kit.make_image_raster(2, 2, &[0; 15], true), Handle::NULL);
        assert_eq!(kit.make_image_raster(0, 2, &[], false), Handle::NULL);
        assert_eq!(kit.make_data(&[]), Handle::NULL);
        assert_eq!(kit.live_objects(), 0);
    }

    #[test]
    fn data_copy_truncates_to_the_destination() {
        let mut kit = Kit::default();
        let data = kit.make_data(b"stipple");
        let mut head = [0; 3];
        assert_eq!(kit.data_copy(data, &mut head), 3);
        assert_eq!(&head, b"sti");
        assert_eq!(kit.ref_count(data), 1);
    }
}
