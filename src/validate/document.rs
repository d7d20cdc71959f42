//! Locating and validating the file specifications of a whole document
//!
//! File specifications are collected from the places a conforming reader
//! would follow them: the `EmbeddedFiles` name tree, associated files (`AF`)
//! arrays, file attachment annotations, and the actions of annotations.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use lopdf::{decode_text_string, Dictionary, Document, Object, ObjectId};
use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::validate::context::{ValidationContext, ValidationOptions};
use crate::validate::entry::{OPTIONAL, REQUIRED};
use crate::validate::file_spec::{
    validate_file_spec_entry, validate_file_specification, validate_file_specification_or_form_object,
    validate_url_spec_entry,
};
use crate::version::{since_version, PdfVersion};

/// Where in the document a file specification was found
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// Leaf of the catalog's `EmbeddedFiles` name tree
    EmbeddedFiles { name: String },
    /// Catalog `AF` array
    CatalogAssociatedFile { index: usize },
    /// Page `AF` array
    PageAssociatedFile { page: u32, index: usize },
    /// `FS` entry of a file attachment annotation
    FileAttachment { page: u32, annot: usize },
    /// `F` entry of an annotation's action
    Action { page: u32, annot: usize, action: String },
    /// `D` entry of a media clip data dictionary of a rendition action
    MediaClip { page: u32, annot: usize },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::EmbeddedFiles { name } => write!(f, "EmbeddedFiles[{}]", name),
            Location::CatalogAssociatedFile { index } => write!(f, "catalog AF[{}]", index),
            Location::PageAssociatedFile { page, index } => write!(f, "page {} AF[{}]", page, index),
            Location::FileAttachment { page, annot } => {
                write!(f, "page {} annotation {} FileAttachment", page, annot)
            }
            Location::Action { page, annot, action } => {
                write!(f, "page {} annotation {} {} action", page, annot, action)
            }
            Location::MediaClip { page, annot } => {
                write!(f, "page {} annotation {} media clip", page, annot)
            }
        }
    }
}

/// The value found at a location, and the rule that applies to it
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// A file specification value (string or dictionary)
    FileSpec(&'a Object),
    /// A file specification held in a dictionary entry
    FileSpecEntry {
        dict: &'a Dictionary,
        dict_name: &'static str,
        entry: &'static str,
        required: bool,
        since: PdfVersion,
    },
    /// A URL specification held in a dictionary entry
    UrlSpecEntry {
        dict: &'a Dictionary,
        dict_name: &'static str,
        entry: &'static str,
        required: bool,
        since: PdfVersion,
    },
    /// A file specification or a form XObject
    FileSpecOrForm(&'a Object),
}

/// A file specification located in a document
#[derive(Debug, Clone)]
pub struct FileSpecSite<'a> {
    pub location: Location,
    pub target: Target<'a>,
}

impl<'a> FileSpecSite<'a> {
    /// Apply the rule for this site
    pub fn validate(&self, ctx: &ValidationContext<'a>) -> Result<()> {
        match self.target {
            Target::FileSpec(object) => validate_file_specification(ctx, object).map(|_| ()),
            Target::FileSpecEntry { dict, dict_name, entry, required, since } => {
                validate_file_spec_entry(ctx, dict, dict_name, entry, required, since).map(|_| ())
            }
            Target::UrlSpecEntry { dict, dict_name, entry, required, since } => {
                validate_url_spec_entry(ctx, dict, dict_name, entry, required, since).map(|_| ())
            }
            Target::FileSpecOrForm(object) => validate_file_specification_or_form_object(ctx, object),
        }
    }

    /// Best display name of the referenced file: `UF`, then `F`, then the platform names
    ///
    /// Returns `None` when the value cannot be read, e.g. for form XObjects.
    pub fn file_name(&self, ctx: &ValidationContext<'a>) -> Option<String> {
        let object = match self.target {
            Target::FileSpec(object) | Target::FileSpecOrForm(object) => object,
            Target::FileSpecEntry { dict, entry, .. } | Target::UrlSpecEntry { dict, entry, .. } => {
                dict.get(entry.as_bytes()).ok()?
            }
        };
        match ctx.resolve(object).ok()? {
            string @ Object::String(..) => decode_text_string(string).ok(),
            Object::Dictionary(dict) => ["UF", "F", "Unix", "Mac", "DOS"].iter().find_map(|key| {
                match ctx.resolve(dict.get(key.as_bytes()).ok()?).ok()? {
                    string @ Object::String(..) => decode_text_string(string).ok(),
                    _ => None,
                }
            }),
            _ => None,
        }
    }
}

impl fmt::Display for FileSpecSite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.location)
    }
}

/// Collect every file specification reachable from the document catalog
pub fn collect_file_specs<'a>(ctx: &ValidationContext<'a>, root: &'a Object) -> Result<Vec<FileSpecSite<'a>>> {
    let catalog = ctx
        .resolve_dict(root, "document catalog")?
        .ok_or_else(|| Error::General("Catalog is null".to_string()))?;

    let mut sites = Vec::new();

    // Document-level embedded files
    if let Ok(names) = catalog.get(b"Names") {
        if let Some(names) = ctx.resolve_dict(names, "name dictionary")? {
            if let Ok(tree) = names.get(b"EmbeddedFiles") {
                let mut visited = BTreeSet::new();
                collect_embedded_files(ctx, tree, &mut visited, &mut sites)?;
            }
        }
    }

    collect_associated_files(ctx, catalog, None, &mut sites)?;

    // Page-level associated files and annotations
    if let Ok(pages) = catalog.get(b"Pages") {
        let mut visited = BTreeSet::new();
        let mut page_number = 0;
        collect_page_tree(ctx, pages, &mut visited, &mut page_number, &mut sites)?;
    }

    debug!("Found {} file specifications", sites.len());
    Ok(sites)
}

/// Guard against reference cycles in trees; returns false when already seen
fn first_visit(object: &Object, visited: &mut BTreeSet<ObjectId>) -> bool {
    match object {
        Object::Reference(id) => {
            if !visited.insert(*id) {
                warn!("Skipping already visited object {} {} R", id.0, id.1);
                return false;
            }
            true
        }
        _ => true,
    }
}

fn collect_embedded_files<'a>(
    ctx: &ValidationContext<'a>,
    node: &'a Object,
    visited: &mut BTreeSet<ObjectId>,
    sites: &mut Vec<FileSpecSite<'a>>,
) -> Result<()> {
    if !first_visit(node, visited) {
        return Ok(());
    }
    let Some(node) = ctx.resolve_dict(node, "EmbeddedFiles name tree node")? else {
        return Ok(());
    };

    if let Ok(names) = node.get(b"Names") {
        let names = ctx.resolve_array(names, "EmbeddedFiles name tree Names")?.unwrap_or_default();
        if names.len() % 2 != 0 {
            return Err(Error::structural("EmbeddedFiles", "name tree Names array corrupt"));
        }
        for pair in names.chunks_exact(2) {
            let name = match ctx.resolve(&pair[0])? {
                key @ Object::String(..) => decode_text_string(key)?,
                other => {
                    return Err(Error::InvalidType {
                        context: "EmbeddedFiles name tree key".to_string(),
                        found: crate::resolve::object_kind(other),
                    })
                }
            };
            sites.push(FileSpecSite {
                location: Location::EmbeddedFiles { name },
                target: Target::FileSpec(&pair[1]),
            });
        }
    }

    if let Ok(kids) = node.get(b"Kids") {
        for kid in ctx.resolve_array(kids, "EmbeddedFiles name tree Kids")?.unwrap_or_default() {
            collect_embedded_files(ctx, kid, visited, sites)?;
        }
    }
    Ok(())
}

/// Associated files arrays are a PDF 2.0 feature, widely written by 1.7 producers
fn collect_associated_files<'a>(
    ctx: &ValidationContext<'a>,
    dict: &'a Dictionary,
    page: Option<u32>,
    sites: &mut Vec<FileSpecSite<'a>>,
) -> Result<()> {
    let Ok(af) = dict.get(b"AF") else {
        return Ok(());
    };
    ctx.ensure_minimum_version("AF", since_version(ctx.mode(), PdfVersion::V2_0, PdfVersion::V1_7))?;

    for (index, spec) in ctx.resolve_array(af, "AF")?.unwrap_or_default().iter().enumerate() {
        let location = match page {
            Some(page) => Location::PageAssociatedFile { page, index },
            None => Location::CatalogAssociatedFile { index },
        };
        sites.push(FileSpecSite { location, target: Target::FileSpec(spec) });
    }
    Ok(())
}

fn collect_page_tree<'a>(
    ctx: &ValidationContext<'a>,
    node: &'a Object,
    visited: &mut BTreeSet<ObjectId>,
    page_number: &mut u32,
    sites: &mut Vec<FileSpecSite<'a>>,
) -> Result<()> {
    if !first_visit(node, visited) {
        return Ok(());
    }
    let Some(dict) = ctx.resolve_dict(node, "page tree node")? else {
        return Ok(());
    };

    // Intermediate node: descend into the kids
    if let Ok(kids) = dict.get(b"Kids") {
        for kid in ctx.resolve_array(kids, "page tree Kids")?.unwrap_or_default() {
            collect_page_tree(ctx, kid, visited, page_number, sites)?;
        }
        return Ok(());
    }

    // Leaf: a page, numbered in document order
    *page_number += 1;
    collect_page(ctx, dict, *page_number, sites)
}

fn collect_page<'a>(
    ctx: &ValidationContext<'a>,
    page_dict: &'a Dictionary,
    page: u32,
    sites: &mut Vec<FileSpecSite<'a>>,
) -> Result<()> {
    collect_associated_files(ctx, page_dict, Some(page), sites)?;

    let Ok(annots) = page_dict.get(b"Annots") else {
        return Ok(());
    };
    for (annot, object) in ctx.resolve_array(annots, "Annots")?.unwrap_or_default().iter().enumerate() {
        let Some(annot_dict) = ctx.resolve_dict(object, "annotation")? else {
            continue;
        };

        if name_of(ctx, annot_dict, b"Subtype").as_deref() == Some("FileAttachment") {
            sites.push(FileSpecSite {
                location: Location::FileAttachment { page, annot },
                target: Target::FileSpecEntry {
                    dict: annot_dict,
                    dict_name: "fileAttachmentAnnotDict",
                    entry: "FS",
                    required: REQUIRED,
                    since: PdfVersion::V1_3,
                },
            });
        }

        if let Ok(action) = annot_dict.get(b"A") {
            if let Some(action) = ctx.resolve_dict(action, "annotation action")? {
                collect_action(ctx, action, page, annot, sites)?;
            }
        }
    }
    Ok(())
}

fn collect_action<'a>(
    ctx: &ValidationContext<'a>,
    action: &'a Dictionary,
    page: u32,
    annot: usize,
    sites: &mut Vec<FileSpecSite<'a>>,
) -> Result<()> {
    let Some(kind) = name_of(ctx, action, b"S") else {
        return Ok(());
    };
    let location = Location::Action { page, annot, action: kind.clone() };

    let target = match kind.as_str() {
        "GoToR" => file_spec_entry(action, "goToRActionDict", REQUIRED, PdfVersion::V1_1),
        "Launch" => file_spec_entry(action, "launchActionDict", OPTIONAL, PdfVersion::V1_0),
        "GoToE" => file_spec_entry(action, "goToEActionDict", OPTIONAL, PdfVersion::V1_6),
        "ImportData" => file_spec_entry(action, "importDataActionDict", REQUIRED, PdfVersion::V1_0),
        "SubmitForm" => Target::UrlSpecEntry {
            dict: action,
            dict_name: "submitFormActionDict",
            entry: "F",
            required: REQUIRED,
            since: PdfVersion::V1_0,
        },
        "Rendition" => return collect_rendition(ctx, action, page, annot, sites),
        _ => return Ok(()),
    };
    sites.push(FileSpecSite { location, target });
    Ok(())
}

fn file_spec_entry<'a>(action: &'a Dictionary, dict_name: &'static str, required: bool, since: PdfVersion) -> Target<'a> {
    Target::FileSpecEntry { dict: action, dict_name, entry: "F", required, since }
}

/// Rendition action → media rendition `C` → media clip data `D`
fn collect_rendition<'a>(
    ctx: &ValidationContext<'a>,
    action: &'a Dictionary,
    page: u32,
    annot: usize,
    sites: &mut Vec<FileSpecSite<'a>>,
) -> Result<()> {
    let Ok(rendition) = action.get(b"R") else {
        return Ok(());
    };
    let Some(rendition) = ctx.resolve_dict(rendition, "rendition")? else {
        return Ok(());
    };
    if name_of(ctx, rendition, b"S").as_deref() != Some("MR") {
        return Ok(());
    }

    let Ok(clip) = rendition.get(b"C") else {
        return Ok(());
    };
    let Some(clip) = ctx.resolve_dict(clip, "media clip")? else {
        return Ok(());
    };
    if name_of(ctx, clip, b"S").as_deref() != Some("MCD") {
        return Ok(());
    }

    if let Ok(data) = clip.get(b"D") {
        sites.push(FileSpecSite {
            location: Location::MediaClip { page, annot },
            target: Target::FileSpecOrForm(data),
        });
    }
    Ok(())
}

fn name_of<'a>(ctx: &ValidationContext<'a>, dict: &'a Dictionary, key: &[u8]) -> Option<String> {
    match ctx.resolve(dict.get(key).ok()?).ok()? {
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// Validate every file specification of a loaded document
///
/// Stops at the first failure. Returns the number of file specifications checked.
pub fn validate_document(doc: &Document, options: &ValidationOptions) -> Result<usize> {
    let ctx = ValidationContext::for_document(doc, options)?;
    let root = doc
        .trailer
        .get(b"Root")
        .map_err(|_| Error::General("No Root in trailer".to_string()))?;

    // Fail fast on the first invalid site
    let sites = collect_file_specs(&ctx, root)?;
    for site in &sites {
        debug!("Checking {}", site.location);
        site.validate(&ctx)?;
    }

    info!("Validated {} file specifications", sites.len());
    Ok(sites.len())
}

/// Load a PDF file and validate its file specifications
pub fn validate_file(path: &Path, options: &ValidationOptions) -> Result<usize> {
    // Validate input exists
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    validate_document(&doc, options)
}
