//! Cross-page grouping of raw forms.
//!
//! Forms sharing a normalized title are either fragments of one logical form
//! that overflowed onto the following page(s), or unrelated repeats of a
//! recurring form (one "Vital Signs" per visit). The largest page gap inside
//! a group decides which: small gaps merge, anything larger keeps every
//! member under a page-qualified key.

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::config::LayoutConfig;
use crate::page::RawForm;

/// Key of a form in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormKey {
    /// A single or merged form: the normalized title.
    Plain(String),
    /// One member of a group whose pages are too far apart to merge.
    Paged(String, u32),
    /// A key whose rendering clashed with an earlier entry, with the
    /// ordinal (from 2) that makes it unique.
    Renamed(Box<FormKey>, u32),
}

impl FormKey {
    pub fn normalized_title(&self) -> &str {
        match self {
            FormKey::Plain(title) | FormKey::Paged(title, _) => title,
            FormKey::Renamed(key, _) => key.normalized_title(),
        }
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormKey::Plain(title) => write!(f, "{title}"),
            FormKey::Paged(title, page) => write!(f, "{title}_PAGE_{page}"),
            FormKey::Renamed(key, ordinal) => write!(f, "{key}_{ordinal}"),
        }
    }
}

impl Serialize for FormKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A document-level form, possibly assembled from several pages.
///
/// `pages` and `page_count` are only present on merged forms; a form seen
/// on a single page keeps the raw shape. `form.is_multi_page` is true only
/// for a merged group; same-page fragments coalesced under a
/// [`FormKey::Paged`] key keep it false.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedForm {
    #[serde(flatten)]
    pub form: RawForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
}

impl MergedForm {
    fn single(form: RawForm) -> Self {
        Self {
            form,
            pages: None,
            page_count: None,
        }
    }

    /// Every page this form covers, ascending.
    pub fn pages(&self) -> Vec<u32> {
        self.pages
            .clone()
            .unwrap_or_else(|| vec![self.form.page_number])
    }
}

/// Ordered mapping from [`FormKey`] to [`MergedForm`]. Iteration order is
/// the order forms were first seen in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormCollection(IndexMap<FormKey, MergedForm>);

impl FormCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FormKey, form: MergedForm) -> Option<MergedForm> {
        self.0.insert(key, form)
    }

    pub fn get(&self, key: &FormKey) -> Option<&MergedForm> {
        self.0.get(key)
    }

    fn contains_name(&self, name: &str) -> bool {
        self.0.keys().any(|k| k.to_string() == name)
    }

    /// Insert under `key`, or under a [`FormKey::Renamed`] variant of it when
    /// another entry already renders to the same name. Returns the key used.
    pub fn insert_unique(&mut self, key: FormKey, form: MergedForm) -> FormKey {
        let mut unique = key.clone();
        let mut ordinal = 2;
        while self.contains_name(&unique.to_string()) {
            unique = FormKey::Renamed(Box::new(key.clone()), ordinal);
            ordinal += 1;
        }
        if unique != key {
            log::warn!("form name '{key}' is already taken, stored as '{unique}'");
        }
        self.0.insert(unique.clone(), form);
        unique
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FormKey> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FormKey, &MergedForm)> {
        self.0.iter()
    }

    /// Rendered keys in collection order.
    pub fn names(&self) -> Vec<String> {
        self.0.keys().map(ToString::to_string).collect()
    }
}

/// Group raw forms by normalized title and merge or split each group.
pub fn merge_cross_page_forms(raw_forms: Vec<RawForm>, config: &LayoutConfig) -> FormCollection {
    let mut groups: IndexMap<String, Vec<RawForm>> = IndexMap::new();
    for form in raw_forms {
        groups
            .entry(form.normalized_title.clone())
            .or_default()
            .push(form);
    }

    let mut collection = FormCollection::new();
    for (title, mut forms) in groups {
        if forms.len() == 1 {
            let form = forms.remove(0);
            collection.insert_unique(FormKey::Plain(title), MergedForm::single(form));
            continue;
        }

        forms.sort_by_key(|f| f.page_number);
        let gap = max_page_gap(&forms);

        if gap <= config.max_merge_page_gap {
            if let Some(merged) = merge_group(forms) {
                log::info!("merged form '{}' across pages {:?}", title, merged.pages());
                collection.insert_unique(FormKey::Plain(title), merged);
            }
        } else {
            for (page, mut members) in split_by_page(forms) {
                log::debug!("kept separate form '{}' on page {}", title, page);
                let entry = if members.len() == 1 {
                    Some(MergedForm::single(members.remove(0)))
                } else {
                    merge_group(members).map(|mut coalesced| {
                        coalesced.form.is_multi_page = false;
                        coalesced
                    })
                };
                if let Some(entry) = entry {
                    collection.insert_unique(FormKey::Paged(title.clone(), page), entry);
                }
            }
        }
    }

    collection
}

/// Largest difference between consecutive page numbers of a page-sorted
/// group. Zero for groups that never leave their first page.
fn max_page_gap(forms: &[RawForm]) -> u32 {
    forms
        .windows(2)
        .map(|pair| pair[1].page_number - pair[0].page_number)
        .max()
        .unwrap_or(0)
}

/// Partition a page-sorted group into runs that share a page, so every
/// page-qualified key is emitted once.
fn split_by_page(forms: Vec<RawForm>) -> Vec<(u32, Vec<RawForm>)> {
    let mut runs: Vec<(u32, Vec<RawForm>)> = Vec::new();
    for form in forms {
        match runs.last_mut() {
            Some((page, members)) if *page == form.page_number => members.push(form),
            _ => runs.push((form.page_number, vec![form])),
        }
    }
    runs
}

/// Fold a page-sorted group into its first member.
fn merge_group(forms: Vec<RawForm>) -> Option<MergedForm> {
    let mut members = forms.into_iter();
    let mut base = members.next()?;

    let mut pages = vec![base.page_number];
    let mut text_parts: Vec<String> = Vec::new();
    push_text(&mut text_parts, &base.full_text);

    for form in members {
        base.content_bounds = base.content_bounds.envelope(&form.content_bounds);
        base.all_words.extend(form.all_words);
        push_text(&mut text_parts, &form.full_text);
        pages.push(form.page_number);
    }
    pages.dedup();

    base.word_count = base.all_words.len();
    base.full_text = text_parts.join(" ");
    base.is_multi_page = true;

    Some(MergedForm {
        page_count: Some(pages.len()),
        pages: Some(pages),
        form: base,
    })
}

fn push_text(parts: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
}
