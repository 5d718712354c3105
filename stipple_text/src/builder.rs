// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accumulation of styled text ahead of layout.

use std::ops::Range;
use std::sync::Arc;

use stipple_imaging::ScopedStack;

use crate::{FontManager, Paragraph, ParagraphStyle, TextError, TextStyle};

/// A contiguous byte range of paragraph text sharing one style.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledRun {
    /// Byte range in the paragraph text.
    pub range: Range<usize>,
    /// Style of every character in the range.
    pub style: TextStyle,
}

/// Collects styled text for a [`Paragraph`].
///
/// Styles nest: text added after [`push_style`](Self::push_style) takes the
/// pushed style until the matching [`pop`](Self::pop). [`build`](Self::build)
/// consumes the builder.
///
/// ```
/// use std::sync::Arc;
/// use stipple_imaging::Argb;
/// use stipple_text::{FontManager, ParagraphBuilder, ParagraphStyle};
///
/// let fonts = Arc::new(FontManager::empty());
/// let mut builder = ParagraphBuilder::new(ParagraphStyle::default(), fonts);
/// let bold = builder.current_style().with_size_and_color(20.0, Argb::RED);
/// builder.push_style(bold);
/// builder.add_text("A").unwrap();
/// builder.pop();
/// builder.add_text("B").unwrap();
/// let paragraph = builder.build(0.0);
/// assert_eq!(paragraph.runs().len(), 2);
/// ```
#[derive(Debug)]
pub struct ParagraphBuilder {
    fonts: Arc<FontManager>,
    style: ParagraphStyle,
    styles: ScopedStack<TextStyle>,
    text: String,
    runs: Vec<StyledRun>,
}

impl ParagraphBuilder {
    /// A builder whose base style is `style.text_style`.
    pub fn new(style: ParagraphStyle, fonts: Arc<FontManager>) -> Self {
        Self {
            fonts,
            styles: ScopedStack::new(style.text_style.clone()),
            style,
            text: String::new(),
            runs: Vec::new(),
        }
    }

    /// The style applied to text added now.
    pub fn current_style(&self) -> &TextStyle {
        self.styles.top()
    }

    /// The paragraph style.
    pub fn paragraph_style(&self) -> &ParagraphStyle {
        &self.style
    }

    /// The fonts the paragraph will lay out with.
    pub fn fonts(&self) -> &Arc<FontManager> {
        &self.fonts
    }

    /// Text accumulated so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Make `style` current and return the nesting depth before the push.
    pub fn push_style(&mut self, style: TextStyle) -> usize {
        self.styles.push(style)
    }

    /// Return to the style before the last push. Popping the base style does
    /// nothing.
    pub fn pop(&mut self) {
        if self.styles.pop().is_none() {
            log::trace!("style pop at the base level ignored");
        }
    }

    /// Append `text` in the current style. Text in the same style as the
    /// previous run extends it.
    pub fn add_text(&mut self, text: &str) -> Result<(), TextError> {
        if text.is_empty() {
            return Err(TextError::EmptyText);
        }
        let start = self.text.len();
        self.text.push_str(text);
        let end = self.text.len();
        let style = self.styles.top();
        match self.runs.last_mut() {
            Some(run) if run.range.end == start && run.style == *style => run.range.end = end,
            _ => self.runs.push(StyledRun {
                range: start..end,
                style: style.clone(),
            }),
        }
        Ok(())
    }

    /// Freeze the text into a paragraph, laying it out at `wrap_width` when
    /// that is positive.
    pub fn build(self, wrap_width: f32) -> Paragraph {
        log::debug!(
            "paragraph built from {} bytes in {} runs",
            self.text.len(),
            self.runs.len()
        );
        let mut paragraph = Paragraph::new(self.fonts, self.style, self.text, self.runs);
        if wrap_width > 0.0 {
            paragraph.layout(wrap_width);
        }
        paragraph
    }
}
