//! End-to-end tests for the fix pipeline over lopdf-built fixture files.

use std::fs;
use std::path::PathBuf;

use lopdf::{Object, Stream, dictionary};
use pdfoutline::fix::{FixOptions, fix_document};

/// Build a PDF whose pages each show the given lines of text.
/// Optionally attaches an outline and/or an Info dictionary.
fn build_pdf(pages: &[&[&str]], with_outline: bool, info_title: Option<&str>) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for lines in pages {
        let mut content = String::from("BT /F1 12 Tf 72 720 Td ");
        for line in *lines {
            content.push_str(&format!("({line}) Tj 0 -16 Td "));
        }
        content.push_str("ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let resources = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        };
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        }));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(pages.len() as i64),
    });
    for &pid in &page_ids {
        if let Ok(page_obj) = doc.get_object_mut(pid) {
            if let Ok(dict) = page_obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    };
    if with_outline {
        let entry_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal("Existing Entry"),
            "Dest" => vec![Object::Reference(page_ids[0]), Object::Name(b"Fit".to_vec())],
        });
        let outlines_id = doc.add_object(dictionary! {
            "Type" => "Outlines",
            "First" => Object::Reference(entry_id),
            "Last" => Object::Reference(entry_id),
            "Count" => Object::Integer(1),
        });
        catalog.set("Outlines", Object::Reference(outlines_id));
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    if let Some(title) = info_title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", Object::Reference(info_id));
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn write_input(dir: &tempfile::TempDir, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join("input.pdf");
    fs::write(&path, bytes).unwrap();
    path
}

fn toc_lines() -> Vec<&'static str> {
    vec![
        "Contents",
        "Chapter 1 .......... 2",
        "Chapter 2 .......... 4",
        "Chapter 3 .......... 6",
        "Chapter 4 .......... 8",
        "Chapter 5 .......... 10",
    ]
}

#[test]
fn heuristic_extraction_adds_outline() {
    let dir = tempfile::tempdir().unwrap();
    let toc = toc_lines();
    let input_bytes = build_pdf(
        &[&toc, &["Intro text"], &["Chapter 1 The Beginning"]],
        false,
        None,
    );
    let input = write_input(&dir, &input_bytes);
    let output = dir.path().join("output.pdf");

    let report = fix_document(&input, &output, &FixOptions::default()).unwrap();
    assert_eq!(report.outline_nodes, 5);
    assert!(!report.copied_verbatim);
    // The body of chapter 1 sits exactly where the contents page says.
    assert_eq!(report.page_offset, 0);

    let out = fs::read(&output).unwrap();
    let text = String::from_utf8_lossy(&out).into_owned();
    assert!(text.contains("/Outlines"));
    assert!(text.contains("/PageMode /UseOutlines"));
    assert!(text.contains("/Dest [2 /Fit]"));
    assert!(out.len() > input_bytes.len());
}

#[test]
fn content_file_supplies_outline_and_info() {
    let dir = tempfile::tempdir().unwrap();
    let input_bytes = build_pdf(&[&["page one"], &["page two"]], false, None);
    let input = write_input(&dir, &input_bytes);
    let output = dir.path().join("output.pdf");

    let content = dir.path().join("contents.txt");
    fs::write(
        &content,
        "title: My Book\nauthor: Someone\nPart One 0\n  Detail 1\nPart Two 1\n",
    )
    .unwrap();

    let options = FixOptions {
        content_file: Some(content),
        ..FixOptions::default()
    };
    let report = fix_document(&input, &output, &options).unwrap();
    assert_eq!(report.outline_nodes, 3);
    assert!(report.info_inserted);
    assert!(!report.info_patched);

    let text = String::from_utf8_lossy(&fs::read(&output).unwrap()).into_owned();
    assert!(text.contains("/PageMode /UseOutlines"));
    assert!(text.contains("/Info "));
    assert!(text.contains("/Author ("));
}

#[test]
fn nothing_to_add_copies_byte_identically() {
    let dir = tempfile::tempdir().unwrap();
    let input_bytes = build_pdf(&[&["plain prose"], &["more prose"]], false, None);
    let input = write_input(&dir, &input_bytes);
    let output = dir.path().join("output.pdf");

    let report = fix_document(&input, &output, &FixOptions::default()).unwrap();
    assert!(report.copied_verbatim);
    assert_eq!(report.outline_nodes, 0);
    assert!(!report.warnings.is_empty(), "no-contents-page warning expected");
    assert_eq!(fs::read(&output).unwrap(), input_bytes);
}

#[test]
fn existing_outline_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let toc = toc_lines();
    // Even with a recognizable contents page, an existing outline wins.
    let input_bytes = build_pdf(&[&toc, &["body"]], true, None);
    let input = write_input(&dir, &input_bytes);
    let output = dir.path().join("output.pdf");

    let report = fix_document(&input, &output, &FixOptions::default()).unwrap();
    assert!(report.copied_verbatim);
    assert_eq!(fs::read(&output).unwrap(), input_bytes);
}

#[test]
fn existing_info_is_patched_with_missing_author() {
    let dir = tempfile::tempdir().unwrap();
    let input_bytes = build_pdf(&[&["plain"]], true, Some("Existing Title"));
    let input = write_input(&dir, &input_bytes);
    let output = dir.path().join("output.pdf");

    let info_file = dir.path().join("info.json");
    fs::write(&info_file, r#"{"title": "Ignored", "author": "Added Author"}"#).unwrap();

    let options = FixOptions {
        content_file: Some(info_file),
        ..FixOptions::default()
    };
    let report = fix_document(&input, &output, &options).unwrap();
    assert!(report.info_patched);
    assert!(!report.info_inserted);

    let text = String::from_utf8_lossy(&fs::read(&output).unwrap()).into_owned();
    // The existing /Title stays; only /Author is injected into the object.
    assert!(text.contains("Existing Title"));
    assert!(text.contains("/Author ("));
    assert_eq!(text.matches("/Author").count(), 1);
}

#[test]
fn missing_input_is_source_open_failure() {
    let dir = tempfile::tempdir().unwrap();
    let err = fix_document(
        &dir.path().join("nope.pdf"),
        &dir.path().join("out.pdf"),
        &FixOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, pdfoutline::PatchError::SourceOpen(_)));
}

#[test]
fn no_temp_file_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let input_bytes = build_pdf(&[&["plain"]], false, None);
    let input = write_input(&dir, &input_bytes);
    let output = dir.path().join("output.pdf");

    fix_document(&input, &output, &FixOptions::default()).unwrap();
    assert!(output.exists());
    assert!(!dir.path().join("output.pdf.tmp").exists());
}
