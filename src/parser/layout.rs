//! Content-stream interpretation and block layout.
//!
//! A page content stream is walked once. Text-showing operators produce
//! positioned [`TextSpan`]s, and `Do` on an image XObject produces an image
//! placement. The initial CTM flips the page so every coordinate that comes
//! out of the scanner is already in top-left-origin page space.

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};
use crate::model::BoundingBox;

use super::backend::RawBlock;

/// Average glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// TJ adjustments (thousandths of an em) larger than this read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Nesting limit for form XObjects.
const MAX_FORM_DEPTH: usize = 8;

/// A run of text with its baseline position in page space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    /// Left edge
    pub x: f32,
    /// Baseline, measured from the top of the page
    pub y: f32,
    pub width: f32,
    /// Effective font size in page units
    pub font_size: f32,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            font_size,
        }
    }

    /// Approximate ascender line.
    pub fn top(&self) -> f32 {
        self.y - self.font_size * 0.8
    }

    /// Approximate descender line.
    pub fn bottom(&self) -> f32 {
        self.y + self.font_size * 0.2
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.top(), self.right(), self.bottom())
    }
}

/// What one pass over a page content stream found.
#[derive(Debug, Clone, Default)]
pub struct PageScan {
    pub spans: Vec<TextSpan>,
    pub images: Vec<BoundingBox>,
}

/// 2-D affine transform in PDF row-vector form `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    pub(crate) const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub(crate) const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Map user space into the visible page: origin at the top-left of the
    /// crop box `[x0 y0 x1 y1]` after turning it clockwise by `rotate`
    /// degrees (0, 90, 180 or 270), y growing downward.
    pub(crate) fn page_space([x0, y0, x1, y1]: [f32; 4], rotate: u16) -> Self {
        match rotate {
            90 => Self::new(0.0, 1.0, 1.0, 0.0, -y0, -x0),
            180 => Self::new(-1.0, 0.0, 0.0, 1.0, x1, -y0),
            270 => Self::new(0.0, -1.0, -1.0, 0.0, y1, x1),
            _ => Self::new(1.0, 0.0, 0.0, -1.0, -x0, y1),
        }
    }

    /// `self` applied first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix::new(
            self.a * other.a + self.b * other.c,
            self.a * other.b + self.b * other.d,
            self.c * other.a + self.d * other.c,
            self.c * other.b + self.d * other.d,
            self.e * other.a + self.f * other.c + other.e,
            self.e * other.b + self.f * other.d + other.f,
        )
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    fn from_operands(operands: &[Object]) -> Option<Matrix> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands[..6].iter().filter_map(get_number).collect();
        (n.len() == 6).then(|| Matrix::new(n[0], n[1], n[2], n[3], n[4], n[5]))
    }
}

#[derive(Debug, Clone)]
struct TextState<'a> {
    font: Option<&'a Dictionary>,
    font_size: f32,
    leading: f32,
    tm: Matrix,
    tlm: Matrix,
}

impl Default for TextState<'_> {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 12.0,
            leading: 0.0,
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
        }
    }
}

impl TextState<'_> {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = if self.leading == 0.0 {
            self.font_size * 1.2
        } else {
            self.leading
        };
        self.move_line(0.0, -leading);
    }

    fn advance(&mut self, tx: f32) {
        self.tm = Matrix::translation(tx, 0.0).then(&self.tm);
    }
}

/// Walks content streams and records text spans and image placements.
pub struct ContentScanner<'a> {
    doc: &'a LopdfDocument,
    scan: PageScan,
}

impl<'a> ContentScanner<'a> {
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self {
            doc,
            scan: PageScan::default(),
        }
    }

    /// Scan a page content stream. `base` maps user space to page space.
    pub fn scan(
        mut self,
        content: &[u8],
        resources: Option<&'a Dictionary>,
        base: Matrix,
    ) -> Result<PageScan> {
        self.run(content, resources, base, 0)?;
        log::debug!(
            "Scanned {} spans and {} images",
            self.scan.spans.len(),
            self.scan.images.len()
        );
        Ok(self.scan)
    }

    fn run(
        &mut self,
        content: &[u8],
        resources: Option<&'a Dictionary>,
        base: Matrix,
        depth: usize,
    ) -> Result<()> {
        let content = lopdf::content::Content::decode(content)
            .map_err(|e| Error::DocumentParse(format!("content stream: {}", e)))?;

        let mut ctm = base;
        let mut ctm_stack: Vec<Matrix> = Vec::new();
        let mut ts = TextState::default();

        for op in &content.operations {
            let operands = op.operands.as_slice();
            match op.operator.as_str() {
                "q" => ctm_stack.push(ctm),
                "Q" => {
                    if let Some(saved) = ctm_stack.pop() {
                        ctm = saved;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        ctm = m.then(&ctm);
                    }
                }
                "BT" => {
                    ts.tm = Matrix::IDENTITY;
                    ts.tlm = Matrix::IDENTITY;
                }
                "Tf" => {
                    if let [Object::Name(name), size, ..] = operands {
                        ts.font = lookup_resource(self.doc, resources, b"Font", name);
                        ts.font_size = get_number(size).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number) {
                        ts.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if let [tx, ty, ..] = operands {
                        let tx = get_number(tx).unwrap_or(0.0);
                        let ty = get_number(ty).unwrap_or(0.0);
                        if op.operator == "TD" {
                            ts.leading = -ty;
                        }
                        ts.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        ts.tlm = m;
                        ts.tm = m;
                    }
                }
                "T*" => ts.next_line(),
                "Tj" => {
                    if let Some(text @ Object::String(..)) = operands.first() {
                        self.show(&mut ts, &ctm, std::slice::from_ref(text));
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        self.show(&mut ts, &ctm, items);
                    }
                }
                "'" | "\"" => {
                    ts.next_line();
                    let idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(text @ Object::String(..)) = operands.get(idx) {
                        self.show(&mut ts, &ctm, std::slice::from_ref(text));
                    }
                }
                "Do" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        self.draw_xobject(name, resources, &ctm, depth)?;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Show strings (and TJ kerning numbers) at the current text position.
    fn show(&mut self, ts: &mut TextState<'a>, ctm: &Matrix, items: &[Object]) {
        let start = ts.tm.then(ctm);
        let mut text = String::new();

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let decoded = self.decode(ts.font, bytes);
                    let advance = decoded.chars().count() as f32 * ts.font_size * AVG_GLYPH_WIDTH;
                    text.push_str(&decoded);
                    ts.advance(advance);
                }
                other => {
                    if let Some(n) = get_number(other) {
                        if -n > TJ_SPACE_THRESHOLD && needs_space(&text) {
                            text.push(' ');
                        }
                        ts.advance(-n / 1000.0 * ts.font_size);
                    }
                }
            }
        }

        if text.trim().is_empty() {
            return;
        }

        let end = ts.tm.then(ctm);
        let (x, y) = start.apply(0.0, 0.0);
        let (end_x, _) = end.apply(0.0, 0.0);
        let font_size = ts.font_size * start.vertical_scale();
        let width = if end_x > x {
            end_x - x
        } else {
            text.chars().count() as f32 * font_size * AVG_GLYPH_WIDTH * start.horizontal_scale()
                / start.vertical_scale().max(f32::EPSILON)
        };

        self.scan.spans.push(TextSpan::new(text, x, y, width, font_size));
    }

    fn decode(&self, font: Option<&Dictionary>, bytes: &[u8]) -> String {
        font.and_then(|f| f.get_font_encoding(self.doc).ok())
            .and_then(|enc| LopdfDocument::decode_text(&enc, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }

    fn draw_xobject(
        &mut self,
        name: &[u8],
        resources: Option<&'a Dictionary>,
        ctm: &Matrix,
        depth: usize,
    ) -> Result<()> {
        let Some(stream) = lookup_xobject(self.doc, resources, name) else {
            log::warn!(
                "XObject /{} is not in the page resources, skipping",
                String::from_utf8_lossy(name)
            );
            return Ok(());
        };

        let subtype = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|s| s.as_name().ok());

        match subtype {
            Some(b"Image") => {
                let corners = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
                if let Some(bbox) =
                    BoundingBox::from_points(corners.iter().map(|&(x, y)| ctm.apply(x, y)))
                {
                    self.scan.images.push(bbox);
                }
            }
            Some(b"Form") if depth < MAX_FORM_DEPTH => {
                let form_matrix = stream
                    .dict
                    .get(b"Matrix")
                    .ok()
                    .and_then(|m| m.as_array().ok())
                    .and_then(|m| Matrix::from_operands(m))
                    .unwrap_or(Matrix::IDENTITY);
                let form_resources = stream
                    .dict
                    .get(b"Resources")
                    .ok()
                    .and_then(|r| resolve_dict(self.doc, r))
                    .or(resources);
                let content = stream_bytes(stream);
                self.run(&content, form_resources, form_matrix.then(ctm), depth + 1)?;
            }
            Some(b"Form") => {
                log::warn!("Form XObjects nested deeper than {}, skipping", MAX_FORM_DEPTH);
            }
            _ => {}
        }

        Ok(())
    }
}

/// Resolve a direct or referenced dictionary.
pub(crate) fn resolve_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(r) => doc.get_dictionary(*r).ok(),
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

/// Raw bytes of a stream, decompressed when a filter is present.
pub(crate) fn stream_bytes(stream: &lopdf::Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

fn lookup_resource<'a>(
    doc: &'a LopdfDocument,
    resources: Option<&'a Dictionary>,
    category: &[u8],
    name: &[u8],
) -> Option<&'a Dictionary> {
    let category = resolve_dict(doc, resources?.get(category).ok()?)?;
    resolve_dict(doc, category.get(name).ok()?)
}

fn lookup_xobject<'a>(
    doc: &'a LopdfDocument,
    resources: Option<&'a Dictionary>,
    name: &[u8],
) -> Option<&'a lopdf::Stream> {
    let xobjects = resolve_dict(doc, resources?.get(b"XObject").ok()?)?;
    match xobjects.get(name).ok()? {
        Object::Reference(r) => doc.get_object(*r).ok()?.as_stream().ok(),
        Object::Stream(s) => Some(s),
        _ => None,
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn needs_space(text: &str) -> bool {
    match text.chars().last() {
        Some(c) => !c.is_whitespace() && !is_spaceless_script_char(c),
        None => false,
    }
}

/// Scripts written without spaces between words (Han, kana, CJK punctuation).
/// Hangul is not one of them.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x3000..=0x30FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0x20000..=0x2EBEF)
}

/// Decode string bytes without font information.
fn decode_text_simple(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Horizontal gap, in font sizes, beyond which spans on one baseline belong
/// to different columns.
const COLUMN_GAP_FACTOR: f32 = 2.0;

/// A group of spans sharing a baseline within one column.
#[derive(Debug, Clone)]
struct TextLine {
    spans: Vec<TextSpan>,
    y: f32,
    x: f32,
    right: f32,
    font_size: f32,
}

impl TextLine {
    fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.total_cmp(&b.x));

        let total_chars: usize = spans.iter().map(|s| s.text.chars().count()).sum();
        let font_size = if total_chars > 0 {
            spans
                .iter()
                .map(|s| s.font_size * s.text.chars().count() as f32)
                .sum::<f32>()
                / total_chars as f32
        } else {
            spans.first().map(|s| s.font_size).unwrap_or(0.0)
        };

        let y = spans.first().map(|s| s.y).unwrap_or(0.0);
        let x = spans.first().map(|s| s.x).unwrap_or(0.0);
        let right = spans.iter().map(TextSpan::right).fold(x, f32::max);
        Self {
            spans,
            y,
            x,
            right,
            font_size,
        }
    }

    fn overlaps_horizontally(&self, other: &TextLine) -> bool {
        self.x < other.right && other.x < self.right
    }

    /// Span texts joined, with a space wherever the horizontal gap looks
    /// like a word break.
    fn text(&self) -> String {
        let mut out = String::new();
        let mut prev: Option<&TextSpan> = None;

        for span in &self.spans {
            if let Some(p) = prev {
                let gap = span.x - p.right();
                let threshold = span.font_size * AVG_GLYPH_WIDTH * 0.2;
                let next_is_spaceless = span
                    .text
                    .chars()
                    .next()
                    .map(|c| c.is_whitespace() || is_spaceless_script_char(c))
                    .unwrap_or(true);
                if gap > threshold && needs_space(&out) && !next_is_spaceless {
                    out.push(' ');
                }
            }
            out.push_str(&span.text);
            prev = Some(span);
        }

        out
    }

    fn bbox(&self) -> Option<BoundingBox> {
        self.spans
            .iter()
            .map(TextSpan::bbox)
            .reduce(|acc, b| acc.union(&b))
    }
}

/// Group spans into lines: sort top-to-bottom, merge spans whose baselines
/// are within 30% of the font size, then split each baseline wherever the
/// horizontal gap is too wide to be a word break.
fn group_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    spans.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut bands: Vec<Vec<TextSpan>> = Vec::new();
    let mut band_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match (band_y, bands.last_mut()) {
            (Some(y), Some(band)) if (span.y - y).abs() <= tolerance => band.push(span),
            _ => {
                band_y = Some(span.y);
                bands.push(vec![span]);
            }
        }
    }

    bands.into_iter().flat_map(split_columns).collect()
}

fn split_columns(mut band: Vec<TextSpan>) -> Vec<TextLine> {
    band.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_right = f32::NEG_INFINITY;

    for span in band {
        let max_gap = span.font_size * COLUMN_GAP_FACTOR;
        if !current.is_empty() && span.x - current_right > max_gap {
            lines.push(TextLine::from_spans(std::mem::take(&mut current)));
            current_right = f32::NEG_INFINITY;
        }
        current_right = current_right.max(span.right());
        current.push(span);
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }
    lines
}

/// Nearest line above `lines[i]` sharing some horizontal extent with it.
fn line_above(lines: &[TextLine], i: usize) -> Option<&TextLine> {
    let line = &lines[i];
    lines[..i]
        .iter()
        .rev()
        .find(|prev| line.y - prev.y > 0.1 && prev.overlaps_horizontally(line))
}

fn average_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = (0..lines.len())
        .filter_map(|i| line_above(lines, i).map(|prev| lines[i].y - prev.y))
        .collect();

    if spacings.is_empty() {
        12.0
    } else {
        spacings.iter().sum::<f32>() / spacings.len() as f32
    }
}

/// A vertical gap wider than 1.5x the average spacing (capped at two font
/// sizes), a font size change or an indent change starts a new block.
fn starts_new_block(prev: &TextLine, curr: &TextLine, avg_spacing: f32) -> bool {
    let max_gap = (avg_spacing * 1.5).min(prev.font_size.max(curr.font_size) * 2.0);
    (curr.y - prev.y).abs() > max_gap
        || (prev.font_size - curr.font_size).abs() > 1.0
        || (prev.x - curr.x).abs() > 20.0
}

/// Lay spans out as text blocks in top-to-bottom order.
///
/// A line continues the nearest block above it in the same column; side by
/// side columns become separate blocks. Lines within a block are joined with
/// `\n`.
pub fn layout_blocks(spans: &[TextSpan]) -> Vec<RawBlock> {
    let lines = group_into_lines(spans.to_vec());
    let avg_spacing = average_line_spacing(&lines);

    let mut groups: Vec<Vec<TextLine>> = Vec::new();
    for line in lines {
        let column = groups.iter_mut().rev().find_map(|group| {
            let last = group.last()?;
            (line.y - last.y > 0.1 && last.overlaps_horizontally(&line)).then_some(group)
        });
        match column {
            Some(group)
                if group
                    .last()
                    .is_some_and(|prev| !starts_new_block(prev, &line, avg_spacing)) =>
            {
                group.push(line)
            }
            _ => groups.push(vec![line]),
        }
    }

    log::debug!(
        "Laid out {} blocks (avg line spacing {:.1})",
        groups.len(),
        avg_spacing
    );

    groups
        .into_iter()
        .filter_map(|group| {
            let bbox = group
                .iter()
                .filter_map(TextLine::bbox)
                .reduce(|acc, b| acc.union(&b))?;
            let text = group
                .iter()
                .map(TextLine::text)
                .collect::<Vec<_>>()
                .join("\n");
            Some(RawBlock::new(bbox, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, x, y, text.len() as f32 * 6.0, 12.0)
    }

    #[test]
    fn test_matrix_then_applies_left_first() {
        let scale = Matrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = Matrix::translation(10.0, 5.0);
        assert_eq!(scale.then(&shift).apply(1.0, 1.0), (12.0, 7.0));
        assert_eq!(shift.then(&scale).apply(1.0, 1.0), (22.0, 12.0));
    }

    #[test]
    fn test_page_space() {
        let flip = Matrix::page_space([0.0, 0.0, 612.0, 792.0], 0);
        assert_eq!(flip.apply(100.0, 700.0), (100.0, 92.0));

        let cropped = Matrix::page_space([20.0, 100.0, 600.0, 900.0], 0);
        assert_eq!(cropped.apply(20.0, 900.0), (0.0, 0.0));
        assert_eq!(cropped.apply(120.0, 875.0), (100.0, 25.0));
    }

    #[test]
    fn test_page_space_rotations() {
        let crop = [0.0, 0.0, 600.0, 800.0];
        // The corner that ends up top-left for each rotation.
        assert_eq!(Matrix::page_space(crop, 90).apply(0.0, 0.0), (0.0, 0.0));
        assert_eq!(Matrix::page_space(crop, 180).apply(600.0, 0.0), (0.0, 0.0));
        assert_eq!(Matrix::page_space(crop, 270).apply(600.0, 800.0), (0.0, 0.0));

        // Unrotated top-left moves to the top-right under a quarter turn.
        assert_eq!(Matrix::page_space(crop, 90).apply(0.0, 800.0), (800.0, 0.0));
        assert_eq!(Matrix::page_space(crop, 270).apply(0.0, 800.0), (0.0, 600.0));
    }

    #[test]
    fn test_span_edges() {
        let s = span("Hello", 10.0, 100.0);
        assert!((s.top() - 90.4).abs() < 1e-4);
        assert!((s.bottom() - 102.4).abs() < 1e-4);
        assert_eq!(s.right(), 40.0);
    }

    #[test]
    fn test_line_text_inserts_word_gaps() {
        let line = TextLine::from_spans(vec![span("World", 50.0, 100.0), span("Hello", 10.0, 100.0)]);
        assert_eq!(line.text(), "Hello World");

        let touching = TextLine::from_spans(vec![span("ab", 10.0, 100.0), span("cd", 22.0, 100.0)]);
        assert_eq!(touching.text(), "abcd");
    }

    #[test]
    fn test_layout_splits_on_large_gap() {
        let spans = vec![
            span("First line", 50.0, 100.0),
            span("second line", 50.0, 114.0),
            span("third line", 50.0, 128.0),
            span("New paragraph", 50.0, 300.0),
        ];

        let blocks = layout_blocks(&spans);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "First line\nsecond line\nthird line");
        assert_eq!(blocks[1].text, "New paragraph");
        assert!(blocks[0].bbox.bottom < blocks[1].bbox.top);
    }

    #[test]
    fn test_layout_splits_on_indent() {
        let spans = vec![span("Body", 50.0, 100.0), span("Indented", 120.0, 114.0)];
        assert_eq!(layout_blocks(&spans).len(), 2);
    }

    #[test]
    fn test_layout_keeps_columns_apart() {
        let spans = vec![
            span("Left column line one", 72.0, 100.0),
            span("Right column line one", 330.0, 100.0),
            span("Left column line two", 72.0, 114.0),
            span("Right column line two", 330.0, 114.0),
        ];

        let blocks = layout_blocks(&spans);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "Left column line one\nLeft column line two");
        assert_eq!(blocks[1].text, "Right column line one\nRight column line two");
        assert!(blocks[0].bbox.right < blocks[1].bbox.left);
    }

    #[test]
    fn test_word_spans_stay_on_one_line() {
        // Separate runs a word gap apart are one line, not two columns.
        let lines = group_into_lines(vec![span("Hello", 10.0, 100.0), span("World", 46.0, 100.0)]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "Hello World");

        let split = group_into_lines(vec![span("Hello", 10.0, 100.0), span("World", 200.0, 100.0)]);
        assert_eq!(split.len(), 2);
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0x48, 0x65, 0x6C, 0x6C, 0xE9]), "Hellé");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }

    #[test]
    fn test_spaceless_scripts() {
        assert!(is_spaceless_script_char('漢'));
        assert!(is_spaceless_script_char('カ'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }
}
