// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line breaking, alignment, and painting of styled paragraphs.

use std::ops::Range;
use std::sync::Arc;

use hashbrown::HashMap;
use icu_segmenter::WordSegmenter;
use icu_segmenter::options::WordBreakInvariantOptions;
use skrifa::{MetadataProvider, OutlineGlyphCollection};
use stipple_imaging::{Argb, Paint, PathBuilder, TextAlign};
use stipple_raster::Canvas;

use crate::builder::StyledRun;
use crate::outline::{GlyphPlacement, append_glyph};
use crate::shape::{Cluster, Shaper};
use crate::{FontManager, ParagraphStyle, TextStyle};

/// Slack allowed when comparing accumulated widths against the layout width.
const WIDTH_EPSILON: f32 = 1e-3;

/// Characters between two break opportunities.
#[derive(Clone, Debug)]
struct Segment {
    clusters: Range<usize>,
    width: f32,
    whitespace: bool,
    /// A hard break or the end of the text follows this segment.
    ends_line: bool,
}

#[derive(Clone, Debug)]
struct Line {
    clusters: Range<usize>,
    /// End of the last non-whitespace cluster.
    content_end: usize,
    width: f32,
    ascent: f32,
    descent: f32,
    baseline: f32,
    left: f32,
    /// Extra advance after each whitespace cluster when justifying.
    justify: f32,
    hard_break: bool,
    ellipsis: Vec<Cluster>,
}

#[derive(Clone, Debug)]
struct Layout {
    width: f32,
    lines: Vec<Line>,
    height: f32,
    longest_line: f32,
    exceeded: bool,
}

/// Measurements of one laid-out line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineMetrics {
    /// Byte range of the paragraph text shown on the line, including
    /// hanging whitespace.
    pub text_range: Range<usize>,
    /// Advance of the visible content, excluding hanging whitespace.
    pub width: f32,
    /// Distance from the line top to the baseline.
    pub ascent: f32,
    /// Distance from the baseline to the line bottom.
    pub descent: f32,
    /// Baseline position from the paragraph top.
    pub baseline: f32,
    /// Horizontal offset applied by alignment.
    pub left: f32,
    /// Whether the line ends at a newline or at the end of the text.
    pub hard_break: bool,
    /// Whether the ellipsis marker ends the line.
    pub ellipsized: bool,
}

/// Immutable styled text with a re-runnable layout.
///
/// Metric queries report the most recent [`layout`](Self::layout) and are
/// zero until the first one.
#[derive(Clone, Debug)]
pub struct Paragraph {
    fonts: Arc<FontManager>,
    style: ParagraphStyle,
    text: String,
    runs: Vec<StyledRun>,
    clusters: Vec<Cluster>,
    segments: Vec<Segment>,
    min_intrinsic: f32,
    max_intrinsic: f32,
    layout: Option<Layout>,
}

impl Paragraph {
    pub(crate) fn new(
        fonts: Arc<FontManager>,
        style: ParagraphStyle,
        text: String,
        runs: Vec<StyledRun>,
    ) -> Self {
        let mut shaper = Shaper::new(&fonts);
        let clusters: Vec<Cluster> = runs
            .iter()
            .flat_map(|run| shaper.shape_str(&run.style, run.range.start, &text[run.range.clone()]))
            .collect();
        let segments = segment(&text, &clusters);
        let min_intrinsic = segments
            .iter()
            .filter(|s| !s.whitespace)
            .map(|s| s.width)
            .fold(0.0, f32::max);
        drop(shaper);
        let mut paragraph = Self {
            fonts,
            style,
            text,
            runs,
            clusters,
            segments,
            min_intrinsic,
            max_intrinsic: 0.0,
            layout: None,
        };
        paragraph.max_intrinsic = paragraph
            .wrap(f32::INFINITY)
            .iter()
            .map(|line| line.width)
            .fold(0.0, f32::max);
        paragraph
    }

    /// The paragraph text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Styled runs in text order.
    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    /// The paragraph style.
    pub fn style(&self) -> &ParagraphStyle {
        &self.style
    }

    /// The fonts the paragraph lays out with.
    pub fn fonts(&self) -> &Arc<FontManager> {
        &self.fonts
    }

    /// Break the text into lines no wider than `width`, replacing any
    /// previous layout.
    pub fn layout(&mut self, width: f32) {
        let mut lines = self.wrap(width);
        let limit = self.style.max_lines;
        let exceeded = limit > 0 && lines.len() > limit;
        if exceeded {
            lines.truncate(limit);
            if let Some(marker) = self.style.ellipsis.as_deref()
                && let Some(last) = lines.last_mut()
            {
                self.ellipsize(last, marker, width);
            }
        }

        let longest_line = lines.iter().map(|l| l.width).fold(0.0, f32::max);
        let available = if width.is_finite() { width } else { longest_line };
        let align = self.style.resolved_align();
        let count = lines.len();
        let mut y = 0.0;
        for (i, line) in lines.iter_mut().enumerate() {
            y += line.ascent;
            line.baseline = y;
            y += line.descent;
            let slack = (available - line.width).max(0.0);
            line.left = match align {
                TextAlign::Right => slack,
                TextAlign::Center => slack * 0.5,
                _ => 0.0,
            };
            if align == TextAlign::Justify && !line.hard_break && i + 1 < count {
                let gaps = self.clusters[line.clusters.start..line.content_end]
                    .iter()
                    .filter(|c| c.whitespace)
                    .count();
                if gaps > 0 {
                    #[allow(
                        clippy::cast_precision_loss,
                        reason = "a line holds far fewer than 2^24 spaces"
                    )]
                    let gaps = gaps as f32;
                    line.justify = slack / gaps;
                }
            }
            log::trace!(
                "line {i}: clusters {:?}, width {}, baseline {}",
                line.clusters,
                line.width,
                line.baseline
            );
        }
        log::debug!("paragraph laid out at width {width}: {count} lines, height {y}");
        self.layout = Some(Layout {
            width,
            lines,
            height: y,
            longest_line,
            exceeded,
        });
    }

    /// Total height of the laid-out lines.
    pub fn height(&self) -> f32 {
        self.layout.as_ref().map_or(0.0, |l| l.height)
    }

    /// The width passed to the last layout.
    pub fn max_width(&self) -> f32 {
        self.layout.as_ref().map_or(0.0, |l| l.width)
    }

    /// Width of the widest unbreakable segment.
    pub fn min_intrinsic_width(&self) -> f32 {
        self.layout.as_ref().map_or(0.0, |_| self.min_intrinsic)
    }

    /// Width the text would take with no soft line breaks.
    pub fn max_intrinsic_width(&self) -> f32 {
        self.layout.as_ref().map_or(0.0, |_| self.max_intrinsic)
    }

    /// Width of the widest laid-out line.
    pub fn longest_line(&self) -> f32 {
        self.layout.as_ref().map_or(0.0, |l| l.longest_line)
    }

    /// Distance from the top to the first line's alphabetic baseline.
    pub fn alphabetic_baseline(&self) -> f32 {
        self.first_line().map_or(0.0, |l| l.baseline)
    }

    /// Distance from the top to the first line's ideographic baseline.
    pub fn ideographic_baseline(&self) -> f32 {
        self.first_line().map_or(0.0, |l| l.baseline + l.descent)
    }

    /// Number of laid-out lines.
    pub fn line_count(&self) -> usize {
        self.layout.as_ref().map_or(0, |l| l.lines.len())
    }

    /// Whether the last layout dropped lines beyond the line limit.
    pub fn did_exceed_max_lines(&self) -> bool {
        self.layout.as_ref().is_some_and(|l| l.exceeded)
    }

    /// Measurements of every laid-out line.
    pub fn line_metrics(&self) -> Vec<LineMetrics> {
        let Some(layout) = &self.layout else {
            return Vec::new();
        };
        layout
            .lines
            .iter()
            .map(|line| LineMetrics {
                text_range: self.byte_at(line.clusters.start)..self.byte_at(line.clusters.end),
                width: line.width,
                ascent: line.ascent,
                descent: line.descent,
                baseline: line.baseline,
                left: line.left,
                hard_break: line.hard_break,
                ellipsized: !line.ellipsis.is_empty(),
            })
            .collect()
    }

    /// The text shown on line `index`, with the ellipsis marker when the line
    /// was truncated.
    pub fn line_text(&self, index: usize) -> Option<String> {
        let line = self.layout.as_ref()?.lines.get(index)?;
        let range = self.byte_at(line.clusters.start)..self.byte_at(line.clusters.end);
        let mut text = self.text[range].to_owned();
        if let Some(marker) = &self.style.ellipsis {
            text.extend(marker.chars().take(line.ellipsis.len()));
        }
        Some(text)
    }

    /// Fill the glyph outlines of every line with their run colors, with the
    /// paragraph's top-left corner at `(x, y)`.
    pub fn paint(&self, canvas: &mut Canvas<'_>, x: f32, y: f32) {
        let Some(layout) = &self.layout else {
            log::debug!("paragraph painted before layout");
            return;
        };
        let mut outlines: HashMap<usize, OutlineGlyphCollection<'_>> = HashMap::new();
        let mut batch = GlyphBatch::new();
        for line in &layout.lines {
            let mut pen = x + line.left;
            let baseline = y + line.baseline;
            let visible = self.clusters[line.clusters.clone()]
                .iter()
                .chain(&line.ellipsis);
            for cluster in visible {
                if let Some((slot, glyph)) = cluster.glyph {
                    if !outlines.contains_key(&slot)
                        && let Some(font) = self.fonts.face(slot).and_then(|f| f.font_ref())
                    {
                        outlines.insert(slot, font.outline_glyphs());
                    }
                    if let Some(collection) = outlines.get(&slot) {
                        batch.set_color(cluster.color, canvas);
                        append_glyph(
                            collection,
                            glyph,
                            cluster.size,
                            GlyphPlacement::at(pen, baseline),
                            &mut batch.builder,
                        );
                    }
                }
                pen += cluster.advance;
                if cluster.whitespace {
                    pen += line.justify;
                }
            }
        }
        batch.flush(canvas);
    }

    fn first_line(&self) -> Option<&Line> {
        self.layout.as_ref()?.lines.first()
    }

    fn byte_at(&self, cluster: usize) -> usize {
        self.clusters.get(cluster).map_or(self.text.len(), |c| c.byte)
    }

    fn style_at(&self, byte: usize) -> &TextStyle {
        self.runs
            .iter()
            .find(|run| run.range.contains(&byte))
            .map_or(&self.style.text_style, |run| &run.style)
    }

    /// Greedy line breaking at segment boundaries, falling back to
    /// character boundaries for segments wider than a line.
    fn wrap(&self, width: f32) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut line = LineBuilder::new(0);
        for segment in &self.segments {
            if segment.whitespace {
                line.push_space(segment.clusters.end, segment.width);
            } else if line.fits(segment.width, width) {
                line.push_content(segment.clusters.end, segment.width);
            } else {
                if line.has_content {
                    lines.push(self.measure(line.finish(false)));
                    line = LineBuilder::new(segment.clusters.start);
                }
                if line.fits(segment.width, width) {
                    line.push_content(segment.clusters.end, segment.width);
                } else {
                    for i in segment.clusters.clone() {
                        let advance = self.clusters[i].advance;
                        if line.has_content && !line.fits(advance, width) {
                            lines.push(self.measure(line.finish(false)));
                            line = LineBuilder::new(i);
                        }
                        line.push_content(i + 1, advance);
                    }
                }
            }
            if segment.ends_line {
                lines.push(self.measure(line.finish(true)));
                line = LineBuilder::new(segment.clusters.end);
            }
        }
        lines
    }

    fn measure(&self, raw: RawLine) -> Line {
        let clusters = &self.clusters[raw.clusters.clone()];
        let (ascent, descent) = if clusters.is_empty() {
            // An empty line takes the extents of the break before it.
            let previous = raw.clusters.start.checked_sub(1).and_then(|i| self.clusters.get(i));
            let fallback = Cluster::placeholder(0, &self.style.text_style);
            let c = previous.unwrap_or(&fallback);
            (c.ascent, c.descent)
        } else {
            extents(clusters)
        };
        let content_end = raw.clusters.start
            + clusters
                .iter()
                .rposition(|c| !c.whitespace)
                .map_or(0, |i| i + 1);
        Line {
            clusters: raw.clusters,
            content_end,
            width: raw.width,
            ascent,
            descent,
            baseline: 0.0,
            left: 0.0,
            justify: 0.0,
            hard_break: raw.hard_break,
            ellipsis: Vec::new(),
        }
    }

    /// Drop trailing content from `line` until `marker` fits in `width`, then
    /// append the marker.
    ///
    /// A marker wider than `width` on its own loses trailing characters
    /// until it fits.
    fn ellipsize(&self, line: &mut Line, marker: &str, width: f32) {
        let start = line.clusters.start;
        let last_byte = self.byte_at(line.content_end.max(start + 1) - 1);
        let style = self.style_at(last_byte);
        let mut shaper = Shaper::new(&self.fonts);
        let mut ellipsis = shaper.shape_str(style, self.byte_at(line.content_end), marker);
        let advance = |clusters: &[Cluster]| -> f32 { clusters.iter().map(|c| c.advance).sum() };
        while advance(&ellipsis[..]) > width + WIDTH_EPSILON && ellipsis.pop().is_some() {}
        let marker_width = advance(&ellipsis[..]);

        let mut end = line.content_end;
        let content_width = |end: usize| -> f32 {
            self.clusters[start..end].iter().map(|c| c.advance).sum()
        };
        while end > start && content_width(end) + marker_width > width + WIDTH_EPSILON {
            end -= 1;
        }
        while end > start && self.clusters[end - 1].whitespace {
            end -= 1;
        }

        line.clusters.end = end;
        line.content_end = end;
        line.width = content_width(end) + marker_width;
        if end > start || !ellipsis.is_empty() {
            let (ascent, descent) = extents(self.clusters[start..end].iter().chain(&ellipsis));
            line.ascent = ascent;
            line.descent = descent;
        }
        line.ellipsis = ellipsis;
    }
}

fn extents<'c>(clusters: impl IntoIterator<Item = &'c Cluster>) -> (f32, f32) {
    clusters.into_iter().fold((0.0_f32, 0.0_f32), |(a, d), c| {
        (a.max(c.ascent), d.max(c.descent))
    })
}

/// Split `text` into hard lines at `\n`, and each hard line into word
/// segments.
fn segment(text: &str, clusters: &[Cluster]) -> Vec<Segment> {
    let words = WordSegmenter::new_auto(WordBreakInvariantOptions::default());
    let cluster_at = |byte: usize| clusters.partition_point(|c| c.byte < byte);
    let make = |bytes: Range<usize>, ends_line: bool| {
        let range = cluster_at(bytes.start)..cluster_at(bytes.end);
        let slice = &clusters[range.clone()];
        Segment {
            width: slice.iter().map(|c| c.advance).sum(),
            whitespace: !slice.is_empty() && slice.iter().all(|c| c.whitespace),
            clusters: range,
            ends_line,
        }
    };

    let mut segments = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);
        let first = segments.len();
        let mut previous = 0;
        for boundary in words.segment_str(content) {
            if boundary > previous {
                segments.push(make(offset + previous..offset + boundary, false));
                previous = boundary;
            }
        }
        if content.len() < line.len() {
            segments.push(make(offset + content.len()..offset + line.len(), false));
        }
        if segments.len() > first {
            if let Some(last) = segments.last_mut() {
                last.ends_line = true;
            }
        } else {
            segments.push(make(offset + line.len()..offset + line.len(), true));
        }
        offset += line.len();
    }
    if text.ends_with('\n') {
        segments.push(make(text.len()..text.len(), true));
    }
    segments
}

struct RawLine {
    clusters: Range<usize>,
    width: f32,
    hard_break: bool,
}

/// Accumulates one line. Whitespace is held as pending until more content
/// follows, so spaces before a break hang past the line width.
struct LineBuilder {
    start: usize,
    end: usize,
    width: f32,
    pending: f32,
    has_content: bool,
}

impl LineBuilder {
    fn new(start: usize) -> Self {
        Self {
            start,
            end: start,
            width: 0.0,
            pending: 0.0,
            has_content: false,
        }
    }

    fn fits(&self, advance: f32, width: f32) -> bool {
        self.width + self.pending + advance <= width + WIDTH_EPSILON
    }

    fn push_space(&mut self, end: usize, advance: f32) {
        self.end = end;
        self.pending += advance;
    }

    fn push_content(&mut self, end: usize, advance: f32) {
        self.end = end;
        self.width += self.pending + advance;
        self.pending = 0.0;
        self.has_content = true;
    }

    fn finish(self, hard_break: bool) -> RawLine {
        RawLine {
            clusters: self.start..self.end,
            width: self.width,
            hard_break,
        }
    }
}

/// Glyph outlines sharing one fill color.
struct GlyphBatch {
    color: Argb,
    builder: PathBuilder,
}

impl GlyphBatch {
    fn new() -> Self {
        Self {
            color: Argb::TRANSPARENT,
            builder: PathBuilder::new(),
        }
    }

    fn set_color(&mut self, color: Argb, canvas: &mut Canvas<'_>) {
        if color != self.color {
            self.flush(canvas);
            self.color = color;
        }
    }

    fn flush(&mut self, canvas: &mut Canvas<'_>) {
        if self.builder.is_empty() {
            return;
        }
        let mut paint = Paint::new();
        paint.set_color(self.color);
        canvas.draw_path(&self.builder.detach(), &paint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParagraphBuilder;
    use stipple_imaging::TextDirection;
    use stipple_raster::{Surface, SurfaceOptions};

    const DEJAVU: &[u8] = include_bytes!("../../assets/fonts/dejavu/DejaVuSans.ttf");

    /// Paragraph over an empty font manager, so every character is a
    /// placeholder `size / 2` wide.
    fn placeholder(text: &str, style: ParagraphStyle) -> Paragraph {
        let mut builder = ParagraphBuilder::new(style, Arc::new(FontManager::empty()));
        builder.add_text(text).expect("text");
        builder.build(0.0)
    }

    fn sized(size: f32) -> ParagraphStyle {
        ParagraphStyle {
            text_style: TextStyle {
                font_size: size,
                ..TextStyle::default()
            },
            ..ParagraphStyle::default()
        }
    }

    #[test]
    fn metrics_are_zero_before_layout() {
        let p = placeholder("hello world", sized(10.0));
        assert_eq!(p.height(), 0.0);
        assert_eq!(p.max_width(), 0.0);
        assert_eq!(p.min_intrinsic_width(), 0.0);
        assert_eq!(p.max_intrinsic_width(), 0.0);
        assert_eq!(p.longest_line(), 0.0);
        assert_eq!(p.alphabetic_baseline(), 0.0);
        assert_eq!(p.line_count(), 0);
        assert!(!p.did_exceed_max_lines(), "no layout yet");
    }

    #[test]
    fn placeholder_layout_is_deterministic() {
        let mut p = placeholder("ab cd", sized(10.0));
        p.layout(100.0);
        assert_eq!(p.line_count(), 1);
        assert_eq!(p.longest_line(), 25.0);
        assert_eq!(p.height(), 10.0);
        assert_eq!(p.alphabetic_baseline(), 8.0);
        assert_eq!(p.ideographic_baseline(), 10.0);
        assert_eq!(p.min_intrinsic_width(), 10.0);
        assert_eq!(p.max_intrinsic_width(), 25.0);
        assert_eq!(p.max_width(), 100.0);
    }

    #[test]
    fn narrower_width_wraps_and_relayout_recomputes() {
        let mut p = placeholder("ab cd", sized(10.0));
        p.layout(12.0);
        assert_eq!(p.line_count(), 2);
        assert_eq!(p.height(), 20.0);
        assert_eq!(p.longest_line(), 10.0);
        assert_eq!(p.line_text(0).as_deref(), Some("ab "));
        assert_eq!(p.line_text(1).as_deref(), Some("cd"));
        p.layout(100.0);
        assert_eq!(p.line_count(), 1);
        assert_eq!(p.height(), 10.0);
    }

    #[test]
    fn long_words_break_between_characters() {
        let mut p = placeholder("abcdefgh", sized(10.0));
        p.layout(22.0);
        let lines: Vec<String> = (0..p.line_count())
            .filter_map(|i| p.line_text(i))
            .collect();
        assert_eq!(lines, ["abcd", "efgh"]);
    }

    #[test]
    fn hard_breaks_start_new_lines() {
        let mut p = placeholder("a\n\nb\n", sized(10.0));
        p.layout(1000.0);
        assert_eq!(p.line_count(), 4);
        let metrics = p.line_metrics();
        assert!(metrics.iter().all(|m| m.hard_break), "{metrics:?}");
        assert_eq!(p.height(), 40.0);
        assert_eq!(p.line_text(2).as_deref(), Some("b\n"));
        assert_eq!(p.line_text(3).as_deref(), Some(""));
    }

    #[test]
    fn max_lines_truncates_with_ellipsis() {
        let style = ParagraphStyle {
            max_lines: 1,
            ellipsis: Some("\u{2026}".to_owned()),
            ..sized(10.0)
        };
        let mut p = placeholder("ab cd ef", style);
        p.layout(22.0);
        assert_eq!(p.line_count(), 1);
        assert!(p.did_exceed_max_lines(), "two lines were dropped");
        assert!(p.longest_line() <= 22.0, "{}", p.longest_line());
        let text = p.line_text(0).expect("one line");
        assert!(text.ends_with('\u{2026}'), "{text:?}");
        assert!(p.line_metrics()[0].ellipsized, "marker recorded");
    }

    #[test]
    fn wide_markers_are_cut_to_the_line() {
        let style = ParagraphStyle {
            max_lines: 1,
            ellipsis: Some("...".to_owned()),
            ..sized(10.0)
        };
        let mut p = placeholder("ab cd ef", style.clone());
        p.layout(12.0);
        assert_eq!(p.longest_line(), 10.0);
        assert_eq!(p.line_text(0).as_deref(), Some(".."));

        let mut p = placeholder("ab cd ef", style);
        p.layout(4.0);
        assert_eq!(p.longest_line(), 0.0);
        assert_eq!(p.line_text(0).as_deref(), Some(""));
        assert!(!p.line_metrics()[0].ellipsized, "no room for any marker");
        assert_eq!(p.height(), 10.0, "the line keeps its height");
    }

    #[test]
    fn max_lines_without_ellipsis_just_truncates() {
        let style = ParagraphStyle {
            max_lines: 2,
            ..sized(10.0)
        };
        let mut p = placeholder("ab cd ef", style);
        p.layout(12.0);
        assert_eq!(p.line_count(), 2);
        assert!(p.did_exceed_max_lines(), "third line dropped");
        assert_eq!(p.line_text(1).as_deref(), Some("cd "));
    }

    #[test]
    fn alignment_offsets_lines() {
        let mut style = sized(10.0);
        style.align = TextAlign::Right;
        let mut p = placeholder("ab", style.clone());
        p.layout(50.0);
        assert_eq!(p.line_metrics()[0].left, 40.0);

        style.align = TextAlign::Center;
        let mut p = placeholder("ab", style.clone());
        p.layout(50.0);
        assert_eq!(p.line_metrics()[0].left, 20.0);

        style.align = TextAlign::Start;
        style.direction = TextDirection::Rtl;
        let mut p = placeholder("ab", style);
        p.layout(50.0);
        assert_eq!(p.line_metrics()[0].left, 40.0);
    }

    #[test]
    fn trailing_whitespace_hangs() {
        let mut p = placeholder("ab   ", sized(10.0));
        p.layout(12.0);
        assert_eq!(p.line_count(), 1);
        assert_eq!(p.longest_line(), 10.0);
    }

    #[test]
    fn real_font_wraps_at_narrow_width_only() {
        let fonts = Arc::new(FontManager::from_buffers(vec![DEJAVU.to_vec()]));
        let mut builder = ParagraphBuilder::new(ParagraphStyle::default(), fonts);
        builder
            .add_text("The quick brown fox jumps over the lazy dog")
            .expect("text");
        let mut p = builder.build(1000.0);
        assert_eq!(p.line_count(), 1);
        let wide = p.height();
        let intrinsic = p.max_intrinsic_width();
        assert!(intrinsic > 0.0 && intrinsic < 1000.0, "{intrinsic}");

        p.layout(intrinsic * 0.5);
        assert!(p.line_count() >= 2, "{}", p.line_count());
        assert!(p.height() > wide, "wrapping adds height");
        assert!(
            p.longest_line() <= intrinsic * 0.5 + WIDTH_EPSILON,
            "lines fit the width"
        );
    }

    #[test]
    fn paint_draws_glyphs_in_run_color() {
        let fonts = Arc::new(FontManager::from_buffers(vec![DEJAVU.to_vec()]));
        let style = ParagraphStyle {
            text_style: TextStyle {
                font_size: 40.0,
                color: Argb::BLUE,
                ..TextStyle::default()
            },
            ..ParagraphStyle::default()
        };
        let mut builder = ParagraphBuilder::new(style, fonts);
        builder.add_text("\u{2588}").expect("text");
        let p = builder.build(100.0);

        let mut surface = Surface::new_raster(64, 64, &SurfaceOptions::default()).expect("surface");
        p.paint(&mut surface.canvas(), 0.0, 0.0);
        let mut inked = 0;
        for px in surface.pixels().chunks_exact(4) {
            if px == [0, 0, 255, 255] {
                inked += 1;
            }
        }
        assert!(inked > 100, "full block is painted blue: {inked}");
    }

    #[test]
    fn paint_before_layout_draws_nothing() {
        let p = placeholder("abc", sized(10.0));
        let mut surface = Surface::new_raster(8, 8, &SurfaceOptions::default()).expect("surface");
        p.paint(&mut surface.canvas(), 0.0, 0.0);
        assert!(surface.pixels().iter().all(|b| *b == 0), "untouched");
    }
}
