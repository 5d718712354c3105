// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A font registry synthesized from caller-supplied font programs.

use std::sync::Arc;

use hashbrown::HashMap;
use peniko::{Blob, FontData};
use skrifa::raw::FileRef;

use crate::Typeface;

/// Every face parsed from a set of font programs, grouped by family.
///
/// The manager owns the font bytes; typefaces handed out share them, so the
/// bytes live as long as anything derived from the manager.
#[derive(Clone, Debug, Default)]
pub struct FontManager {
    faces: Vec<Arc<Typeface>>,
    families: Vec<String>,
    by_family: HashMap<String, Vec<usize>>,
}

impl FontManager {
    /// A manager with no fonts. Every character falls back to the placeholder
    /// glyph.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse every face of every buffer. Buffers that are not font programs
    /// are skipped.
    pub fn from_buffers(buffers: Vec<Vec<u8>>) -> Self {
        let mut manager = Self::default();
        for (i, buffer) in buffers.into_iter().enumerate() {
            let blob = Blob::from(buffer);
            let count = match FileRef::new(blob.as_ref()) {
                Ok(FileRef::Font(_)) => 1,
                Ok(FileRef::Collection(collection)) => collection.len(),
                Err(err) => {
                    log::warn!("font buffer {i} skipped: {err}");
                    continue;
                }
            };
            for index in 0..count {
                match Typeface::from_data(FontData::new(blob.clone(), index)) {
                    Ok(face) => manager.add(face),
                    Err(err) => log::warn!("font buffer {i} face {index} skipped: {err}"),
                }
            }
        }
        log::debug!(
            "font manager built with {} faces in {} families",
            manager.faces.len(),
            manager.families.len()
        );
        manager
    }

    fn add(&mut self, face: Typeface) {
        let key = face.family_name().to_lowercase();
        let slot = self.faces.len();
        let family = self.by_family.entry(key).or_insert_with(|| {
            self.families.push(face.family_name().to_owned());
            Vec::new()
        });
        family.push(slot);
        self.faces.push(Arc::new(face));
    }

    /// Number of distinct family names.
    pub fn count_families(&self) -> usize {
        self.families.len()
    }

    /// Family name `index`, in the order families were first seen.
    pub fn family_name(&self, index: usize) -> Option<&str> {
        self.families.get(index).map(String::as_str)
    }

    /// Every parsed face, in load order.
    pub fn typefaces(&self) -> &[Arc<Typeface>] {
        &self.faces
    }

    /// The face of family `name` closest to regular weight and upright.
    /// Family names compare case-insensitively.
    pub fn match_family(&self, name: &str) -> Option<&Arc<Typeface>> {
        self.family_faces(name)
            .min_by(|a, b| {
                regular_distance(&self.faces[*a]).total_cmp(&regular_distance(&self.faces[*b]))
            })
            .map(|slot| &self.faces[slot])
    }

    /// The first face covering `ch`, trying `families` in order before every
    /// other face.
    pub fn typeface_for_char(&self, families: &[String], ch: char) -> Option<&Arc<Typeface>> {
        self.face_for_char(families, ch).map(|slot| &self.faces[slot])
    }

    pub(crate) fn face(&self, slot: usize) -> Option<&Arc<Typeface>> {
        self.faces.get(slot)
    }

    pub(crate) fn face_for_char(&self, families: &[String], ch: char) -> Option<usize> {
        self.preferred_faces(families)
            .chain(0..self.faces.len())
            .find(|slot| self.faces[*slot].glyph_for_char(ch).is_some())
    }

    /// Faces of `families` in order, the primary choice first.
    pub(crate) fn preferred_faces<'a>(
        &'a self,
        families: &'a [String],
    ) -> impl Iterator<Item = usize> + 'a {
        families.iter().flat_map(|name| self.family_faces(name))
    }

    fn family_faces<'a>(&'a self, name: &str) -> impl Iterator<Item = usize> + 'a {
        self.by_family
            .get(&name.to_lowercase())
            .into_iter()
            .flatten()
            .copied()
    }
}

fn regular_distance(face: &Typeface) -> f32 {
    let slant = if face.is_italic() { 1000.0 } else { 0.0 };
    (face.weight() - 400.0).abs() + slant
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEJAVU: &[u8] = include_bytes!("../../assets/fonts/dejavu/DejaVuSans.ttf");

    #[test]
    fn empty_manager_has_no_families() {
        let manager = FontManager::from_buffers(Vec::new());
        assert_eq!(manager.count_families(), 0);
        assert!(manager.family_name(0).is_none(), "no families");
        assert!(
            manager.typeface_for_char(&[], 'a').is_none(),
            "nothing covers anything"
        );
    }

    #[test]
    fn skips_unparseable_buffers() {
        let manager = FontManager::from_buffers(vec![b"garbage".to_vec(), DEJAVU.to_vec()]);
        assert_eq!(manager.count_families(), 1);
        assert_eq!(manager.family_name(0), Some("DejaVu Sans"));
        assert_eq!(manager.typefaces().len(), 1);
    }

    #[test]
    fn duplicate_programs_share_a_family() {
        let manager = FontManager::from_buffers(vec![DEJAVU.to_vec(), DEJAVU.to_vec()]);
        assert_eq!(manager.count_families(), 1);
        assert_eq!(manager.typefaces().len(), 2);
    }

    #[test]
    fn matches_family_case_insensitively() {
        let manager = FontManager::from_buffers(vec![DEJAVU.to_vec()]);
        let face = manager.match_family("dejavu sans").expect("family present");
        assert_eq!(face.family_name(), "DejaVu Sans");
        assert!(manager.match_family("Nope").is_none(), "unknown family");
    }

    #[test]
    fn falls_back_to_any_covering_face() {
        let manager = FontManager::from_buffers(vec![DEJAVU.to_vec()]);
        let families = ["Missing".to_owned()];
        assert!(
            manager.typeface_for_char(&families, 'x').is_some(),
            "fallback face covers latin"
        );
        assert!(
            manager.typeface_for_char(&families, '\u{10FFFD}').is_none(),
            "no face covers private use"
        );
    }
}
