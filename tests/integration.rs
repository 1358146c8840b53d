//! Integration tests for the slide-notes library
//!
//! Decks are generated with lopdf into a temporary directory, converted, and
//! the written output is loaded back for inspection.

use lopdf::{
    dictionary, Dictionary, Document, EncryptionState, EncryptionVersion, Object, ObjectId,
    Permissions, Stream, StringFormat,
};
use slide_notes::options::{NotesOptions, Rgb};
use slide_notes::pdf::{compose, convert, SlideDeck};
use slide_notes::{Error, ErrorKind};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a deck of `count` 720x540 slides; each draws "Slide N" with a font
/// inherited from the page tree
fn write_deck(dir: &Path, name: &str, count: usize) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids = Vec::new();
    for n in 1..=count {
        let content = format!("BT /F1 48 Tf 100 250 Td (Slide {}) Tj ET", n);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => count as i64,
            "Kids" => kids,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(720),
                Object::Integer(540),
            ],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).expect("Failed to write test deck");
    path
}

/// Re-save a deck with an owner password only, so it opens without prompting
fn encrypt_deck(path: &Path, encrypted: &Path) {
    let mut doc = Document::load(path).expect("Failed to load test deck");
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(b"slide-notes-id-1".to_vec(), StringFormat::Literal),
            Object::String(b"slide-notes-id-2".to_vec(), StringFormat::Literal),
        ]),
    );
    let version = EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password: "",
        key_length: 128,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version).expect("Failed to set up encryption");
    doc.encrypt(&state).expect("Failed to encrypt deck");
    doc.save(encrypted).expect("Failed to write encrypted deck");
}

fn output_pages(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

fn page_text(doc: &Document, page_id: ObjectId) -> String {
    let content = doc.get_page_content(page_id).expect("Failed to read page content");
    String::from_utf8_lossy(&content).into_owned()
}

fn page_xobjects(doc: &Document, page_id: ObjectId) -> Dictionary {
    let page = doc.get_dictionary(page_id).expect("Page is not a dictionary");
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    resources.get(b"XObject").unwrap().as_dict().unwrap().clone()
}

fn stream_text(doc: &Document, id: ObjectId) -> String {
    let stream = doc.get_object(id).unwrap().as_stream().unwrap();
    let bytes = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    String::from_utf8_lossy(&bytes).into_owned()
}

#[test]
fn test_twelve_slides_five_per_page() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_deck(temp_dir.path(), "lecture.pdf", 12);
    let output = temp_dir.path().join("lecture_notes.pdf");

    let summary = convert(&input, &output, &NotesOptions::default(), |_| {})
        .expect("Failed to convert");

    assert_eq!(summary.total_slides, 12);
    assert_eq!(summary.output_pages, 3);

    let doc = Document::load(&output).expect("Failed to load output");
    let pages = output_pages(&doc);
    assert_eq!(pages.len(), 3);

    let sizes: Vec<usize> = pages.iter().map(|&id| page_xobjects(&doc, id).len()).collect();
    assert_eq!(sizes, vec![5, 5, 2]);

    assert!(page_text(&doc, pages[0]).contains("(Slides 1-5) Tj"));
    assert!(page_text(&doc, pages[1]).contains("(Slides 6-10) Tj"));
    assert!(page_text(&doc, pages[2]).contains("(Slides 11-12) Tj"));
    assert!(page_text(&doc, pages[2]).contains("(Page 3) Tj"));
}

#[test]
fn test_output_pages_are_letter_size() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_deck(temp_dir.path(), "deck.pdf", 3);
    let output = temp_dir.path().join("out.pdf");

    convert(&input, &output, &NotesOptions::default(), |_| {}).expect("Failed to convert");

    let doc = Document::load(&output).expect("Failed to load output");
    for page_id in output_pages(&doc) {
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box: Vec<f32> = page
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_float().unwrap())
            .collect();
        assert_eq!(media_box, vec![0.0, 0.0, 612.0, 792.0]);
    }
}

#[test]
fn test_single_slide_last_page_label_and_separator() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_deck(temp_dir.path(), "deck.pdf", 11);
    let output = temp_dir.path().join("out.pdf");

    convert(&input, &output, &NotesOptions::default(), |_| {}).expect("Failed to convert");

    let doc = Document::load(&output).expect("Failed to load output");
    let pages = output_pages(&doc);
    assert_eq!(pages.len(), 3);

    let last = page_text(&doc, pages[2]);
    assert!(last.contains("(Slide 11) Tj"));
    // Separator stops at the bottom of the single occupied slot
    assert!(last.contains("428.4 633.6 m 428.4 792 l S"));
    assert!(last.contains("0.6 0.6 0.6 RG"));
}

#[test]
fn test_slides_are_embedded_in_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_deck(temp_dir.path(), "deck.pdf", 7);
    let output = temp_dir.path().join("out.pdf");

    let options = NotesOptions {
        slides_per_page: 3,
        ..Default::default()
    };
    convert(&input, &output, &options, |_| {}).expect("Failed to convert");

    let doc = Document::load(&output).expect("Failed to load output");
    let mut slide = 1;
    for page_id in output_pages(&doc) {
        let xobjects = page_xobjects(&doc, page_id);
        for slot in 0..xobjects.len() {
            let name = format!("Slide{}", slot);
            let form_id = xobjects.get(name.as_bytes()).unwrap().as_reference().unwrap();

            assert!(stream_text(&doc, form_id).contains(&format!("(Slide {}) Tj", slide)));

            // Inherited resources travel with the form
            let form = doc.get_object(form_id).unwrap().as_stream().unwrap();
            let resources = form.dict.get(b"Resources").unwrap();
            let resources = match resources {
                Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
                other => other.as_dict().unwrap(),
            };
            assert!(resources.has(b"Font"));

            slide += 1;
        }
    }
    assert_eq!(slide, 8);
}

#[test]
fn test_total_slides_preserved() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_deck(temp_dir.path(), "deck.pdf", 13);

    for slides_per_page in [1, 2, 4, 5, 10] {
        let deck = SlideDeck::open(&input).expect("Failed to open deck");
        let options = NotesOptions {
            slides_per_page,
            ..Default::default()
        };

        let notes = compose(deck, &options).expect("Failed to compose");
        assert_eq!(notes.slides_placed(), 13);
        assert_eq!(notes.page_count(), 13usize.div_ceil(slides_per_page));
        assert_eq!(notes.document().get_pages().len(), notes.page_count());
    }
}

#[test]
fn test_progress_reported_per_batch() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_deck(temp_dir.path(), "deck.pdf", 12);
    let output = temp_dir.path().join("out.pdf");

    let mut seen = Vec::new();
    convert(&input, &output, &NotesOptions::default(), |progress| {
        seen.push((progress.pages_done, progress.slides_done));
    })
    .expect("Failed to convert");

    assert_eq!(seen, vec![(1, 5), (2, 10), (3, 12)]);
}

#[test]
fn test_repeat_runs_have_same_layout() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_deck(temp_dir.path(), "deck.pdf", 9);
    let first = temp_dir.path().join("first.pdf");
    let second = temp_dir.path().join("second.pdf");

    let options = NotesOptions {
        slides_per_page: 4,
        show_borders: true,
        ..Default::default()
    };
    convert(&input, &first, &options, |_| {}).expect("Failed to convert");
    convert(&input, &second, &options, |_| {}).expect("Failed to convert");

    let first = Document::load(&first).unwrap();
    let second = Document::load(&second).unwrap();
    let first_pages = output_pages(&first);
    let second_pages = output_pages(&second);

    assert_eq!(first_pages.len(), second_pages.len());
    for (a, b) in first_pages.iter().zip(&second_pages) {
        assert_eq!(page_text(&first, *a), page_text(&second, *b));
    }
}

#[test]
fn test_label_and_custom_separator_color() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_deck(temp_dir.path(), "deck.pdf", 2);
    let output = temp_dir.path().join("out.pdf");

    let options = NotesOptions {
        label: Some("\u{1F4DA} Biology".to_string()),
        separator_color: Some(Rgb::new(0.0, 0.0, 0.0)),
        show_page_numbers: false,
        ..Default::default()
    };
    convert(&input, &output, &options, |_| {}).expect("Failed to convert");

    let doc = Document::load(&output).unwrap();
    let text = page_text(&doc, output_pages(&doc)[0]);
    assert!(text.contains("(Biology NOTES) Tj"));
    assert!(text.contains("0 0 0 RG"));
    assert!(!text.contains("(Page 1)"));
}

#[test]
fn test_owner_password_deck_writes_plain_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let plain = write_deck(temp_dir.path(), "plain.pdf", 2);
    let input = temp_dir.path().join("locked.pdf");
    encrypt_deck(&plain, &input);
    let output = temp_dir.path().join("out.pdf");

    convert(&input, &output, &NotesOptions::default(), |_| {}).expect("Failed to convert");

    let doc = Document::load(&output).expect("Failed to load output");
    assert!(doc.trailer.get(b"Encrypt").is_err());
    assert!(!doc.is_encrypted());

    let page_id = output_pages(&doc)[0];
    let xobjects = page_xobjects(&doc, page_id);
    for slot in 0..2 {
        let name = format!("Slide{}", slot);
        let form_id = xobjects.get(name.as_bytes()).unwrap().as_reference().unwrap();
        assert!(stream_text(&doc, form_id).contains(&format!("(Slide {}) Tj", slot + 1)));
    }
    assert!(page_text(&doc, page_id).contains("(NOTES) Tj"));
}

#[test]
fn test_existing_output_is_replaced() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_deck(temp_dir.path(), "deck.pdf", 2);
    let output = temp_dir.path().join("out.pdf");
    std::fs::write(&output, b"old contents").unwrap();

    convert(&input, &output, &NotesOptions::default(), |_| {}).expect("Failed to convert");

    let doc = Document::load(&output).expect("Output should be a valid PDF");
    assert_eq!(output_pages(&doc).len(), 1);
}

#[test]
fn test_empty_pdf_rejected_without_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_deck(temp_dir.path(), "empty.pdf", 0);
    let output = temp_dir.path().join("empty_notes.pdf");

    let result = convert(&input, &output, &NotesOptions::default(), |_| {});

    let err = result.expect_err("Should fail with an empty deck");
    assert!(matches!(err, Error::EmptyPdf(_)));
    assert_eq!(err.kind(), ErrorKind::Input);
    assert!(!output.exists(), "No output should be written");
}

#[test]
fn test_invalid_options_rejected_before_reading() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = temp_dir.path().join("out.pdf");
    // The input does not exist, so a config error proves it was never opened
    let input = temp_dir.path().join("missing.pdf");

    for slides_per_page in [0, 11] {
        let options = NotesOptions {
            slides_per_page,
            ..Default::default()
        };
        let err = convert(&input, &output, &options, |_| {}).expect_err("Should reject");
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    let options = NotesOptions {
        note_space_ratio: 1.0,
        ..Default::default()
    };
    let err = convert(&input, &output, &options, |_| {}).expect_err("Should reject");
    assert!(matches!(err, Error::NoteSpaceRatio(_)));
    assert!(!output.exists());
}

#[test]
fn test_input_errors() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = temp_dir.path().join("out.pdf");

    let missing = convert(
        Path::new("nonexistent.pdf"),
        &output,
        &NotesOptions::default(),
        |_| {},
    );
    assert!(matches!(missing, Err(Error::FileNotFound(_))));

    let wrong_ext = temp_dir.path().join("slides.txt");
    std::fs::write(&wrong_ext, b"hello").unwrap();
    let result = convert(&wrong_ext, &output, &NotesOptions::default(), |_| {});
    assert!(matches!(result, Err(Error::NotPdf(_))));

    let corrupt = temp_dir.path().join("corrupt.pdf");
    std::fs::write(&corrupt, b"this is not a pdf").unwrap();
    let err = convert(&corrupt, &output, &NotesOptions::default(), |_| {})
        .expect_err("Should fail to parse");
    assert!(matches!(err, Error::Unreadable { .. }));
    assert_eq!(err.kind(), ErrorKind::Input);

    assert!(!output.exists());
}

#[test]
fn test_uppercase_extension_accepted() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_deck(temp_dir.path(), "DECK.PDF", 1);
    let output = temp_dir.path().join("out.pdf");

    let summary = convert(&input, &output, &NotesOptions::default(), |_| {})
        .expect("Failed to convert");
    assert_eq!(summary.output_pages, 1);
}
