//! Inline layout and the line box model.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block. Horizontal
//! margins, borders, and padding are respected between these boxes."
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "The height of the line box is determined by the rules given in the
//! section on line height calculations."

use crate::box_model::Rect;
use crate::layout_node::LayoutId;

/// Font metrics interface for text measurement during layout.
///
/// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
///
/// "CSS assumes that every font has font metrics that specify a
/// characteristic height above the baseline and a depth below it."
pub trait FontMetrics {
    /// Measure the total advance width of a text string at the given font size.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Calculate the line height for a given font size.
    ///
    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "The initial value of 'line-height' is 'normal'. We recommend a used
    /// value for 'normal' between 1.0 and 1.2."
    fn line_height(&self, font_size: f32) -> f32;
}

/// Approximate font metrics using fixed ratios.
///
/// Every character advances 0.6× the font size (typical average for Latin
/// text in a proportional face); lines are 1.2× the font size tall, the
/// upper end of the recommended range for `line-height: normal`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontMetrics;

impl ApproximateFontMetrics {
    /// Advance width per character, as a fraction of the font size.
    pub const CHAR_WIDTH_RATIO: f32 = 0.6;
    /// Line height as a multiple of the font size.
    pub const LINE_HEIGHT_RATIO: f32 = 1.2;
}

impl FontMetrics for ApproximateFontMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * Self::CHAR_WIDTH_RATIO
    }

    fn line_height(&self, font_size: f32) -> f32 {
        font_size * Self::LINE_HEIGHT_RATIO
    }
}

/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// "The rectangular area that contains the boxes that form a line is called
/// a line box."
#[derive(Debug, Clone, PartialEq)]
pub struct LineBox {
    /// The bounding rectangle of this line box, in absolute coordinates.
    pub bounds: Rect,

    /// Fragments laid out on this line, left to right.
    pub fragments: Vec<LineBoxFragment>,

    /// "The height of the line box is the distance between the uppermost
    /// box top and the lowermost box bottom."
    pub line_height: f32,
}

/// A positioned piece of an inline-level box on one line.
///
/// For text, `start..start + length` is the byte range of the text run the
/// fragment shows; consecutive words of one run on one line share a
/// fragment. Forced breaks produce zero-length fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct LineBoxFragment {
    /// The box this fragment belongs to.
    pub layout_node: LayoutId,
    /// Byte offset of the first character shown.
    pub start: usize,
    /// Number of bytes shown.
    pub length: usize,
    /// The position and size of this fragment, in absolute coordinates.
    pub bounds: Rect,
}

impl LineBoxFragment {
    /// The slice of `text` this fragment shows, with runs of whitespace
    /// collapsed to single spaces the way they were measured.
    #[must_use]
    pub fn collapsed_text(&self, text: &str) -> String {
        text.get(self.start..self.start + self.length)
            .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default()
    }
}

/// Inline formatting context that manages line box construction.
///
/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// Content is fed in document order. Positions are absolute: lines start
/// at `origin_x` and stack downward from the starting y.
#[derive(Debug)]
pub struct InlineLayout {
    /// Completed line boxes.
    pub line_boxes: Vec<LineBox>,
    /// Fragments accumulating on the current line.
    current_line_fragments: Vec<LineBoxFragment>,
    /// Advance on the current line, relative to `origin_x`.
    current_x: f32,
    /// Top of the current line.
    current_y: f32,
    /// Left edge of every line.
    origin_x: f32,
    /// Maximum width available for line boxes.
    available_width: f32,
    /// Tallest fragment on the current line.
    current_line_max_height: f32,
    /// Width of a collapsed space seen since the last placed content, if
    /// any. Dropped at the start of a line.
    pending_space: Option<f32>,
    /// Left margin+border+padding of inline boxes opened since the last
    /// placed content. Placed together with the next fragment, so it moves
    /// to the next line when that fragment does.
    pending_edge: Option<f32>,
}

impl InlineLayout {
    /// Create a new inline layout context for a containing block's content box.
    #[must_use]
    pub const fn new(origin_x: f32, start_y: f32, available_width: f32) -> Self {
        Self {
            line_boxes: Vec::new(),
            current_line_fragments: Vec::new(),
            current_x: 0.0,
            current_y: start_y,
            origin_x,
            available_width,
            current_line_max_height: 0.0,
            pending_space: None,
            pending_edge: None,
        }
    }

    /// The top of the line currently being filled.
    #[must_use]
    pub const fn current_y(&self) -> f32 {
        self.current_y
    }

    /// [§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
    ///
    /// Add a text run to the inline formatting context.
    ///
    /// "When an inline box exceeds the width of a line box, it is split into
    /// several boxes and these boxes are distributed across several line boxes."
    ///
    /// The run is split into words at whitespace. A word that would overflow
    /// a non-empty line moves to a new line; a word wider than an empty line
    /// is placed anyway and overflows.
    pub fn add_text(
        &mut self,
        layout_node: LayoutId,
        text: &str,
        font_size: f32,
        font_metrics: &dyn FontMetrics,
    ) {
        // STEP 1: Measure once per run.
        let line_height = font_metrics.line_height(font_size);
        let space_width = font_metrics.text_width(" ", font_size);

        let mut previous_end = 0;
        for (start, end) in word_ranges(text) {
            // STEP 2: Whitespace before the word collapses to one space.
            // [§ 4.1.1 Phase I: Collapsing and Transformation](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
            if start > previous_end {
                self.pending_space = Some(space_width);
            }
            previous_end = end;

            let word = &text[start..end];
            let word_width = font_metrics.text_width(word, font_size);

            // STEP 3: Break before the word if it does not fit.
            // [§ 5.5 Line Breaking Details](https://www.w3.org/TR/css-text-3/#line-breaking)
            //
            // The `current_x > 0.0` guard places an over-wide word on an
            // empty line instead of looping forever.
            let edge = self.pending_edge.unwrap_or(0.0);
            let gap = self.leading_space();
            if self.current_x > 0.0 && self.current_x + gap + edge + word_width > self.available_width {
                self.finish_line();
            }

            // STEP 4: Place the word after any opened box edges.
            let gap = self.leading_space() + edge;
            self.pending_edge = None;
            self.place_word(layout_node, start, end, gap, word_width, line_height);
        }

        // Trailing whitespace (or a whitespace-only run) separates this run
        // from whatever comes next.
        if previous_end < text.len() {
            self.pending_space = Some(space_width);
        }
    }

    /// The space owed before the next piece of content: nothing at the
    /// start of a line.
    fn leading_space(&self) -> f32 {
        if self.current_x > 0.0 {
            self.pending_space.unwrap_or(0.0)
        } else {
            0.0
        }
    }

    fn place_word(
        &mut self,
        layout_node: LayoutId,
        start: usize,
        end: usize,
        gap: f32,
        word_width: f32,
        line_height: f32,
    ) {
        let x = self.origin_x + self.current_x + gap;
        self.current_x += gap + word_width;
        self.pending_space = None;
        self.current_line_max_height = self.current_line_max_height.max(line_height);

        // Consecutive words of the same run on the same line share a fragment.
        if let Some(last) = self.current_line_fragments.last_mut()
            && last.layout_node == layout_node
            && last.length > 0
        {
            last.length = end - last.start;
            last.bounds.width = x + word_width - last.bounds.x;
            last.bounds.height = last.bounds.height.max(line_height);
            return;
        }

        self.current_line_fragments.push(LineBoxFragment {
            layout_node,
            start,
            length: end - start,
            bounds: Rect::new(x, self.current_y, word_width, line_height),
        });
    }

    /// [§ 5.5.1 Line Breaking Details](https://www.w3.org/TR/css-text-3/#line-breaking)
    ///
    /// "A line break is forced at a preserved newline."
    ///
    /// Close the current line. An otherwise empty line still gets a line
    /// box of `line_height`, so consecutive breaks produce blank lines.
    pub fn add_line_break(&mut self, layout_node: LayoutId, line_height: f32) {
        self.flush_pending_edge();
        let x = self.origin_x + self.current_x;
        self.current_line_fragments.push(LineBoxFragment {
            layout_node,
            start: 0,
            length: 0,
            bounds: Rect::new(x, self.current_y, 0.0, line_height),
        });
        self.current_line_max_height = self.current_line_max_height.max(line_height);
        self.finish_line();
    }

    /// [§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
    ///
    /// "Horizontal margins, borders, and padding are respected between
    /// these boxes."
    ///
    /// Open an inline box. Its left edge is held until the box's first
    /// content is placed; a pending space goes before it.
    pub fn begin_inline_box(&mut self, left_mbp: f32) {
        self.pending_edge = Some(self.pending_edge.unwrap_or(0.0) + left_mbp);
    }

    /// Close an inline box, advancing past its right edge.
    pub fn end_inline_box(&mut self, right_mbp: f32) {
        self.flush_pending_edge();
        self.current_x += right_mbp;
    }

    /// Place held box edges on the current line with no content after them.
    fn flush_pending_edge(&mut self) {
        if let Some(edge) = self.pending_edge.take() {
            self.current_x += self.leading_space() + edge;
            self.pending_space = None;
        }
    }

    /// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// Finalize the current line box and start a new one. A line without
    /// fragments produces no line box.
    pub fn finish_line(&mut self) {
        if !self.current_line_fragments.is_empty() {
            let line_height = self.current_line_max_height;
            let fragments = std::mem::take(&mut self.current_line_fragments);
            self.line_boxes.push(LineBox {
                bounds: Rect::new(self.origin_x, self.current_y, self.current_x, line_height),
                fragments,
                line_height,
            });
            self.current_y += line_height;
        }

        self.current_x = 0.0;
        self.current_line_max_height = 0.0;
        self.pending_space = None;
    }

    /// Flush the last line and hand over the line boxes.
    #[must_use]
    pub fn finish(mut self) -> Vec<LineBox> {
        self.finish_line();
        self.line_boxes
    }

    /// Return the total height consumed by all completed line boxes.
    ///
    /// [§ 10.6.3](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
    ///
    /// "If 'height' is 'auto'... the height is the distance between the top
    /// content edge and the bottom edge of the last line box."
    #[must_use]
    pub fn total_height(&self) -> f32 {
        self.line_boxes.iter().map(|lb| lb.line_height).sum()
    }
}

/// Byte ranges of the whitespace-separated words of `text`.
fn word_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut word_start = None;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = word_start.take() {
                ranges.push((start, i));
            }
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(start) = word_start {
        ranges.push((start, text.len()));
    }
    ranges
}
