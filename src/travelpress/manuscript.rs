//! Markdown manuscripts.
//!
//! The admin CLI authors articles as plain Markdown files. Every top-level
//! element becomes one block, in source order:
//!
//! - a paragraph that is nothing but a single image, `![caption](target)`,
//!   becomes an image block;
//! - anything else (paragraphs, headings, lists, quotes) becomes a text block
//!   holding its raw source.
//!
//! Image targets starting with `http://` or `https://` are already hosted and
//! are used as the block url. Any other target is a file path, relative to the
//! manuscript, which is attached to the block as a pending upload.
//!
//! Exported articles put a `<!-- block -->` line in front of every block. When
//! a manuscript carries those markers, each marked chunk is exactly one block,
//! so text blocks with blank lines (or no text at all) survive an edit.

use crate::composer::Composer;
use crate::error::{PressError, Result};
use crate::imaging::ImageFile;
use crate::model::{Article, Block};
use pulldown_cmark::{Event, LinkType, Parser, Tag, TagEnd};
use pulldown_cmark_to_cmark::cmark;
use std::fs;
use std::path::{Path, PathBuf};

/// Line that opens a block in exported manuscripts.
pub const BLOCK_MARKER: &str = "<!-- block -->";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Text(String),
    Image { caption: String, target: String },
}

impl Section {
    fn image(caption: String, target: String) -> Self {
        Section::Image { caption, target }
    }
}

pub fn is_hosted(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

#[derive(Default)]
struct Element {
    raw: String,
    paragraph: bool,
    image: Option<(String, String)>,
    in_image: bool,
    extra: bool,
}

impl Element {
    fn finish(self) -> Section {
        match self.image {
            Some((target, caption)) if self.paragraph && !self.extra => {
                Section::image(caption.trim().to_string(), target)
            }
            _ => Section::Text(self.raw),
        }
    }
}

/// Split a manuscript into sections.
pub fn parse(source: &str) -> Vec<Section> {
    match marked_chunks(source) {
        Some(chunks) => chunks.iter().map(|chunk| marked_section(chunk)).collect(),
        None => parse_elements(source),
    }
}

/// Raw chunks between marker lines, or `None` for an unmarked manuscript.
///
/// Text before the first marker counts as a chunk only when it is not blank.
/// The exporter ends every chunk but the last with an empty line; that line
/// and the final newline are not part of the block.
fn marked_chunks(source: &str) -> Option<Vec<String>> {
    let mut preamble = String::new();
    let mut chunks: Vec<String> = Vec::new();

    for line in source.split_inclusive('\n') {
        if line.trim() == BLOCK_MARKER {
            chunks.push(String::new());
        } else if let Some(chunk) = chunks.last_mut() {
            chunk.push_str(line);
        } else {
            preamble.push_str(line);
        }
    }
    if chunks.is_empty() {
        return None;
    }

    let last = chunks.len() - 1;
    for (i, chunk) in chunks.iter_mut().enumerate() {
        let trailing = if i < last { 2 } else { 1 };
        for _ in 0..trailing {
            if chunk.ends_with('\n') {
                chunk.pop();
            }
        }
    }
    if !preamble.trim().is_empty() {
        chunks.insert(0, preamble.trim().to_string());
    }
    Some(chunks)
}

/// A marked chunk is an image block when it is a lone image, text otherwise.
fn marked_section(chunk: &str) -> Section {
    match parse_elements(chunk).as_slice() {
        [image @ Section::Image { .. }] => image.clone(),
        _ => Section::Text(chunk.to_string()),
    }
}

/// One section per top-level Markdown element.
fn parse_elements(source: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut depth = 0usize;
    let mut current: Option<Element> = None;

    for (event, range) in Parser::new(source).into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    current = Some(Element {
                        raw: source[range].trim().to_string(),
                        paragraph: matches!(tag, Tag::Paragraph),
                        ..Element::default()
                    });
                } else if let Some(el) = current.as_mut() {
                    match tag {
                        Tag::Image { dest_url, .. } if depth == 1 && el.image.is_none() => {
                            el.image = Some((dest_url.to_string(), String::new()));
                            el.in_image = true;
                        }
                        _ if el.in_image => {}
                        _ => el.extra = true,
                    }
                }
                depth += 1;
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                if let Some(el) = current.as_mut() {
                    if end == TagEnd::Image && depth == 1 {
                        el.in_image = false;
                    }
                }
                if depth == 0 {
                    if let Some(el) = current.take() {
                        sections.push(el.finish());
                    }
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(el) = current.as_mut() {
                    if el.in_image {
                        if let Some((_, caption)) = el.image.as_mut() {
                            caption.push_str(&text);
                        }
                    } else if !text.trim().is_empty() {
                        el.extra = true;
                    }
                }
            }
            Event::SoftBreak | Event::HardBreak => {}
            _ if depth == 0 => {
                let raw = source[range].trim();
                if !raw.is_empty() {
                    sections.push(Section::Text(raw.to_string()));
                }
            }
            _ => {
                if let Some(el) = current.as_mut() {
                    el.extra = true;
                }
            }
        }
    }
    sections
}

/// Build a composer from sections, reading local image files relative to `base_dir`.
pub fn to_composer(sections: &[Section], base_dir: &Path) -> Result<Composer> {
    let mut composer = Composer::empty();
    for section in sections {
        match section {
            Section::Text(value) => {
                composer.append_text();
                composer.update_text(composer.len() - 1, value.clone())?;
            }
            Section::Image { caption, target } => {
                let id = composer.append_image();
                let index = composer.len() - 1;
                composer.update_image_caption(index, caption.clone())?;
                if is_hosted(target) {
                    composer.set_uploaded_url(id, target.clone())?;
                } else if !target.is_empty() {
                    let path = resolve(base_dir, target);
                    let file = ImageFile::read(&path).map_err(|e| match e {
                        PressError::Io(io) => PressError::validation(
                            "image",
                            format!("cannot read {}: {}", path.display(), io),
                        ),
                        other => other,
                    })?;
                    composer.attach_file(index, file)?;
                }
            }
        }
    }
    if composer.is_empty() {
        composer.append_text();
    }
    Ok(composer)
}

fn resolve(base_dir: &Path, target: &str) -> PathBuf {
    let path = Path::new(target);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Read and parse a manuscript file into a composer.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Composer> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(PressError::Io)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let sections = parse(&source);
    tracing::debug!(path = %path.display(), sections = sections.len(), "Parsed manuscript");
    to_composer(&sections, base_dir)
}

/// Write an article back out as a manuscript, one marked chunk per block.
pub fn export(article: &Article) -> Result<String> {
    let mut chunks = Vec::with_capacity(article.blocks.len());
    for block in &article.blocks {
        let body = match block {
            Block::Text { value } => value.clone(),
            Block::Image { url, caption } => image_markdown(url, caption)?,
        };
        chunks.push(format!("{}\n{}\n", BLOCK_MARKER, body));
    }
    Ok(chunks.join("\n"))
}

fn image_markdown(url: &str, caption: &str) -> Result<String> {
    let mut events = vec![Event::Start(Tag::Image {
        link_type: LinkType::Inline,
        dest_url: url.into(),
        title: "".into(),
        id: "".into(),
    })];
    // cmark escapes a markup character only at the start of a text event.
    events.extend(caption_runs(caption).into_iter().map(|run| Event::Text(run.into())));
    events.push(Event::End(TagEnd::Image));

    let mut out = String::new();
    cmark(events.iter(), &mut out)
        .map_err(|e| PressError::Api(format!("Could not write image markdown: {}", e)))?;
    Ok(out.trim().to_string())
}

/// Caption split so every ASCII punctuation character is its own run.
fn caption_runs(caption: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    for (i, c) in caption.char_indices() {
        if c.is_ascii_punctuation() {
            if start < i {
                runs.push(&caption[start..i]);
            }
            runs.push(&caption[i..i + 1]);
            start = i + 1;
        }
    }
    if start < caption.len() {
        runs.push(&caption[start..]);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::new_article;
    use crate::model::ArticleId;

    const SOURCE: &str = "\
# El Nido

We took the first boat out.
It was *early*.

![Big Lagoon at dawn](https://cdn.example/lagoon.jpg)

![Secret beach](photos/beach.png)

Look at ![this](https://cdn.example/inline.jpg) inline.
";

    #[test]
    fn splits_top_level_elements() {
        let sections = parse(SOURCE);
        assert_eq!(
            sections,
            vec![
                Section::Text("# El Nido".into()),
                Section::Text("We took the first boat out.\nIt was *early*.".into()),
                Section::Image {
                    caption: "Big Lagoon at dawn".into(),
                    target: "https://cdn.example/lagoon.jpg".into()
                },
                Section::Image {
                    caption: "Secret beach".into(),
                    target: "photos/beach.png".into()
                },
                Section::Text("Look at ![this](https://cdn.example/inline.jpg) inline.".into()),
            ]
        );
    }

    #[test]
    fn empty_manuscript_gives_one_empty_paragraph() {
        assert!(parse("").is_empty());
        let composer = to_composer(&[], Path::new(".")).unwrap();
        assert_eq!(composer.to_blocks(), vec![Block::text("")]);
    }

    #[test]
    fn local_images_become_pending_uploads() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("photos")).unwrap();
        fs::write(dir.path().join("photos/beach.png"), [1u8, 2, 3]).unwrap();
        let manuscript = dir.path().join("trip.md");
        fs::write(&manuscript, SOURCE).unwrap();

        let composer = load(&manuscript).unwrap();
        assert_eq!(composer.len(), 5);
        assert_eq!(
            composer.get(2).unwrap().to_block(),
            Block::image("https://cdn.example/lagoon.jpg", "Big Lagoon at dawn")
        );
        assert!(composer.get(2).unwrap().pending_file().is_none());

        let pending = composer.get(3).unwrap().pending_file().unwrap();
        assert_eq!(pending.name, "beach.png");
        assert_eq!(pending.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn missing_local_image_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let sections = vec![Section::image("x".into(), "nope.jpg".into())];
        let err = to_composer(&sections, dir.path()).unwrap_err();
        assert!(matches!(err, PressError::Validation { field: "image", .. }));
    }

    fn exported(blocks: Vec<Block>) -> Article {
        Article::from_new(ArticleId::new("a1"), new_article("Batad", "Ifugao", blocks))
    }

    fn read_back(text: &str) -> Vec<Block> {
        to_composer(&parse(text), Path::new(".")).unwrap().to_blocks()
    }

    #[test]
    fn export_marks_every_block() {
        let article = exported(vec![
            Block::text("Hello"),
            Block::image("https://cdn.example/rice.jpg", "Rice terraces"),
            Block::text("Bye"),
        ]);
        let text = export(&article).unwrap();
        assert_eq!(
            text,
            "<!-- block -->\nHello\n\n\
             <!-- block -->\n![Rice terraces](https://cdn.example/rice.jpg)\n\n\
             <!-- block -->\nBye\n"
        );
        assert_eq!(read_back(&text), article.blocks);
    }

    #[test]
    fn edit_keeps_paragraphs_empty_blocks_and_caption_markup() {
        let article = exported(vec![
            Block::text("First paragraph.\n\nSecond paragraph of the same block."),
            Block::text(""),
            Block::image("https://cdn.example/sunset.jpg", "Sunset *wow*"),
            Block::image("https://cdn.example/rice.jpg", "Rice [terraces] `cam` _raw_ a \\ b"),
            Block::text("  - a list\n  - kept as written"),
        ]);
        let text = export(&article).unwrap();
        assert_eq!(text.matches(BLOCK_MARKER).count(), 5);
        assert_eq!(read_back(&text), article.blocks);
    }

    #[test]
    fn single_text_block_with_blank_lines_stays_whole() {
        let article = exported(vec![Block::text("One.\n\nTwo.")]);
        let text = export(&article).unwrap();
        assert_eq!(read_back(&text), vec![Block::text("One.\n\nTwo.")]);
    }

    #[test]
    fn text_written_above_the_first_marker_becomes_a_block() {
        let source = "Added later.\n\n<!-- block -->\nHello\n";
        assert_eq!(
            parse(source),
            vec![
                Section::Text("Added later.".into()),
                Section::Text("Hello".into()),
            ]
        );
    }

    #[test]
    fn marked_chunk_with_image_and_text_is_text() {
        let source = "<!-- block -->\n![a](https://x/a.jpg) and more\n";
        assert_eq!(
            parse(source),
            vec![Section::Text("![a](https://x/a.jpg) and more".into())]
        );
    }
}
