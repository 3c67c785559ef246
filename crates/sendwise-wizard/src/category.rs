//! Recipient hierarchy: items, categories and the two seams the wizard
//! consumes on top of them.
//!
//! A send dialog lets the user narrow recipients through a cascade of
//! categories (institution, grade, class, student).  Which items a category
//! shows depends on what is selected elsewhere; that rule lives behind
//! [`EligibilityFilter`].  Turning selected items into
//! [`StudentRecipient`]s lives behind [`StudentExtractor`].  Both come with a
//! stock implementation ([`UpstreamFilter`], [`FieldExtractor`]) and both are
//! implemented for plain closures.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

/// Keys serialized from [`Item`]'s own fields; never stored as domain fields.
const RESERVED_FIELDS: [&str; 2] = ["id", "name"];

/// A selectable leaf entity, e.g. a student or a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique within its category.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Arbitrary domain fields (`studentId`, `userInstitutionId`, `classId`, ...)
    /// as they arrive from the picker: strings, numbers, booleans or null.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Item {
    /// Create an item with no domain fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Attach a domain field.  `id` and `name` are ignored; set them through
    /// [`Item::new`].
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if RESERVED_FIELDS.contains(&key.as_str()) {
            return self;
        }
        self.fields.insert(key, value.into());
        self
    }

    /// Look up a domain field as text.
    ///
    /// Strings come back as is, numbers and booleans in their JSON spelling.
    /// Null, arrays and objects have no text form and read as `None`.
    pub fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.fields.get(key)? {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Declares that a category only shows items matching the selection of an
/// upstream category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    /// Key of the upstream category.
    pub category: String,
    /// Item field compared against the upstream selected ids.
    pub field: String,
}

impl CategoryFilter {
    /// Filter on `field` against the selection of `category`.
    pub fn new(category: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            field: field.into(),
        }
    }
}

/// One level of a cascading selection hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryConfig {
    /// Identifies the category; [`CategoryFilter::category`] refers to it.
    pub key: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Items on offer, eligible or not.
    #[serde(default)]
    pub itens: Vec<Item>,
    /// `None` and an empty list both mean "nothing selected".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_ids: Option<Vec<String>>,
    /// Upstream category this one is narrowed by, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_by: Option<CategoryFilter>,
}

impl CategoryConfig {
    /// Create an empty category.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            itens: Vec::new(),
            selected_ids: None,
            filtered_by: None,
        }
    }

    /// Set the items.
    pub fn with_items(mut self, itens: impl IntoIterator<Item = Item>) -> Self {
        self.itens = itens.into_iter().collect();
        self
    }

    /// Replace the selection.
    pub fn with_selection<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Only show items whose `field` matches a selected id of `category`.
    pub fn filtered_by(mut self, category: impl Into<String>, field: impl Into<String>) -> Self {
        self.filtered_by = Some(CategoryFilter::new(category, field));
        self
    }

    /// Selected ids, empty when nothing is selected.
    pub fn selected_ids(&self) -> &[String] {
        self.selected_ids.as_deref().unwrap_or_default()
    }

    /// Whether at least one id is selected.
    pub fn has_selection(&self) -> bool {
        !self.selected_ids().is_empty()
    }

    /// Whether `id` is among the selected ids.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids().iter().any(|s| s == id)
    }

    /// Selected items in item order. Ids with no matching item are skipped.
    pub fn selected_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.itens.iter().filter(|item| self.is_selected(&item.id))
    }
}

/// Normalized recipient derived from selected items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecipient {
    /// Student identifier, unique within a recipient list.
    pub student_id: String,
    /// The student's enrollment in the institution.
    pub user_institution_id: String,
}

impl StudentRecipient {
    /// Create a recipient.
    pub fn new(student_id: impl Into<String>, user_institution_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            user_institution_id: user_institution_id.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

/// Computes the items a category shows given the selections held by every
/// category.
///
/// Implementations must be deterministic and side-effect free: the
/// auto-selection pass calls them repeatedly and in any order.
pub trait EligibilityFilter {
    fn eligible_items(&self, category: &CategoryConfig, all: &[CategoryConfig]) -> Vec<Item>;
}

impl<T> EligibilityFilter for T
where
    T: Fn(&CategoryConfig, &[CategoryConfig]) -> Vec<Item>,
{
    fn eligible_items(&self, category: &CategoryConfig, all: &[CategoryConfig]) -> Vec<Item> {
        self(category, all)
    }
}

/// Cascading filter driven by [`CategoryConfig::filtered_by`].
///
/// * no `filtered_by`: every item is eligible;
/// * `filtered_by { category, field }`: items whose `field` equals one of the
///   upstream category's selected ids; nothing while the upstream category
///   has no selection or is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpstreamFilter;

impl EligibilityFilter for UpstreamFilter {
    fn eligible_items(&self, category: &CategoryConfig, all: &[CategoryConfig]) -> Vec<Item> {
        let Some(dep) = &category.filtered_by else {
            return category.itens.clone();
        };
        let Some(upstream) = all.iter().find(|c| c.key == dep.category) else {
            return Vec::new();
        };
        category
            .itens
            .iter()
            .filter(|item| {
                item.field(&dep.field)
                    .is_some_and(|value| upstream.is_selected(&value))
            })
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Derives the recipient list from the current category selections.
pub trait StudentExtractor {
    fn extract(&self, categories: &[CategoryConfig]) -> Vec<StudentRecipient>;
}

impl<T> StudentExtractor for T
where
    T: Fn(&[CategoryConfig]) -> Vec<StudentRecipient>,
{
    fn extract(&self, categories: &[CategoryConfig]) -> Vec<StudentRecipient> {
        self(categories)
    }
}

/// Reads recipients from item fields.
///
/// Walks the categories in order and keeps every selected item that carries
/// both fields.  A student selected in several categories is listed once, at
/// its first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExtractor {
    /// Item field holding the student id (default `studentId`).
    pub student_id_field: String,
    /// Item field holding the enrollment id (default `userInstitutionId`).
    pub user_institution_id_field: String,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self {
            student_id_field: "studentId".to_string(),
            user_institution_id_field: "userInstitutionId".to_string(),
        }
    }
}

impl StudentExtractor for FieldExtractor {
    fn extract(&self, categories: &[CategoryConfig]) -> Vec<StudentRecipient> {
        let mut seen = HashSet::new();
        categories
            .iter()
            .flat_map(CategoryConfig::selected_items)
            .filter_map(|item| {
                let student_id = item.field(&self.student_id_field)?;
                let user_institution_id = item.field(&self.user_institution_id_field)?;
                Some(StudentRecipient::new(
                    student_id.into_owned(),
                    user_institution_id.into_owned(),
                ))
            })
            .filter(|student| seen.insert(student.student_id.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, ui: &str) -> Item {
        Item::new(id, format!("Student {id}"))
            .with_field("studentId", id)
            .with_field("userInstitutionId", ui)
    }

    fn school() -> Vec<CategoryConfig> {
        vec![
            CategoryConfig::new("classes", "Classes")
                .with_items([Item::new("c1", "1A"), Item::new("c2", "1B")]),
            CategoryConfig::new("students", "Students")
                .with_items([
                    student("s1", "ui1").with_field("classId", "c1"),
                    student("s2", "ui2").with_field("classId", "c1"),
                    student("s3", "ui3").with_field("classId", "c2"),
                ])
                .filtered_by("classes", "classId"),
        ]
    }

    #[test]
    fn empty_selection_counts_as_none() {
        let cat = CategoryConfig::new("k", "K").with_selection(Vec::<String>::new());
        assert!(!cat.has_selection());
        assert!(!CategoryConfig::new("k", "K").has_selection());
    }

    #[test]
    fn selected_items_skip_unknown_ids() {
        let cat = CategoryConfig::new("k", "K")
            .with_items([Item::new("a", "A"), Item::new("b", "B")])
            .with_selection(["b", "zzz"]);
        let ids: Vec<_> = cat.selected_items().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn unfiltered_category_shows_everything() {
        let cats = school();
        assert_eq!(UpstreamFilter.eligible_items(&cats[0], &cats).len(), 2);
    }

    #[test]
    fn filtered_category_is_empty_until_upstream_selected() {
        let cats = school();
        assert!(UpstreamFilter.eligible_items(&cats[1], &cats).is_empty());
    }

    #[test]
    fn filtered_category_follows_upstream_selection() {
        let mut cats = school();
        cats[0] = cats[0].clone().with_selection(["c2"]);
        let eligible = UpstreamFilter.eligible_items(&cats[1], &cats);
        let ids: Vec<_> = eligible.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["s3"]);
    }

    #[test]
    fn missing_upstream_hides_everything() {
        let cats = school();
        let orphan = cats[1].clone().filtered_by("nowhere", "classId");
        assert!(UpstreamFilter.eligible_items(&orphan, &cats).is_empty());
    }

    #[test]
    fn closures_are_filters() {
        let first_only = |c: &CategoryConfig, _: &[CategoryConfig]| -> Vec<Item> {
            c.itens.iter().take(1).cloned().collect()
        };
        let cats = school();
        assert_eq!(first_only.eligible_items(&cats[0], &cats).len(), 1);
    }

    #[test]
    fn field_extractor_reads_selected_students() {
        let mut cats = school();
        cats[1] = cats[1].clone().with_selection(["s3", "s1"]);
        let students = FieldExtractor::default().extract(&cats);
        assert_eq!(
            students,
            vec![
                StudentRecipient::new("s1", "ui1"),
                StudentRecipient::new("s3", "ui3"),
            ]
        );
    }

    #[test]
    fn field_extractor_skips_items_without_fields() {
        let cats = vec![
            CategoryConfig::new("mixed", "Mixed")
                .with_items([Item::new("x", "No fields"), student("s1", "ui1")])
                .with_selection(["x", "s1"]),
        ];
        assert_eq!(
            FieldExtractor::default().extract(&cats),
            vec![StudentRecipient::new("s1", "ui1")]
        );
    }

    #[test]
    fn field_extractor_dedupes_by_student_id() {
        let cats = vec![
            CategoryConfig::new("a", "A")
                .with_items([student("s1", "ui1")])
                .with_selection(["s1"]),
            CategoryConfig::new("b", "B")
                .with_items([student("s1", "ui9")])
                .with_selection(["s1"]),
        ];
        assert_eq!(
            FieldExtractor::default().extract(&cats),
            vec![StudentRecipient::new("s1", "ui1")]
        );
    }

    #[test]
    fn categories_deserialize_from_picker_json() {
        let json = r#"[
            {
                "key": "students",
                "label": "Students",
                "itens": [{ "id": "s1", "name": "Ana", "studentId": "s1", "userInstitutionId": "ui1" }],
                "selectedIds": ["s1"],
                "filteredBy": { "category": "classes", "field": "classId" }
            }
        ]"#;
        let cats: Vec<CategoryConfig> = serde_json::from_str(json).unwrap();
        assert_eq!(cats[0].itens[0].field("userInstitutionId").as_deref(), Some("ui1"));
        assert_eq!(cats[0].selected_ids(), ["s1".to_string()]);
        assert_eq!(
            cats[0].filtered_by,
            Some(CategoryFilter::new("classes", "classId"))
        );
    }

    #[test]
    fn item_fields_accept_json_scalars() {
        let json = r#"[
            {
                "key": "students",
                "itens": [
                    { "id": "s1", "name": "Ana", "active": true, "grade": 5, "note": null }
                ]
            }
        ]"#;
        let cats: Vec<CategoryConfig> = serde_json::from_str(json).unwrap();
        let item = &cats[0].itens[0];
        assert_eq!(item.field("active").as_deref(), Some("true"));
        assert_eq!(item.field("grade").as_deref(), Some("5"));
        assert_eq!(item.field("note"), None);
        assert_eq!(item.field("missing"), None);
    }

    #[test]
    fn numeric_ids_drive_filter_and_extractor() {
        let json = r#"[
            { "key": "classes", "itens": [{ "id": "7" }], "selectedIds": ["7"] },
            {
                "key": "students",
                "itens": [
                    { "id": "s1", "classId": 7, "studentId": 101, "userInstitutionId": 9001 },
                    { "id": "s2", "classId": 8, "studentId": 102, "userInstitutionId": 9002 }
                ],
                "selectedIds": ["s1"],
                "filteredBy": { "category": "classes", "field": "classId" }
            }
        ]"#;
        let cats: Vec<CategoryConfig> = serde_json::from_str(json).unwrap();
        let eligible = UpstreamFilter.eligible_items(&cats[1], &cats);
        let ids: Vec<_> = eligible.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["s1"]);
        assert_eq!(
            FieldExtractor::default().extract(&cats),
            vec![StudentRecipient::new("101", "9001")]
        );
    }

    #[test]
    fn reserved_keys_are_not_domain_fields() {
        let item = Item::new("s1", "Ana")
            .with_field("id", "other")
            .with_field("name", "Other")
            .with_field("studentId", "s1");
        assert_eq!(item.id, "s1");
        assert_eq!(item.name, "Ana");
        assert_eq!(item.fields.len(), 1);

        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"id":"s1","name":"Ana","studentId":"s1"}"#);
    }

    #[test]
    fn recipient_serializes_camel_case() {
        let json = serde_json::to_string(&StudentRecipient::new("s1", "ui1")).unwrap();
        assert_eq!(json, r#"{"studentId":"s1","userInstitutionId":"ui1"}"#);
    }
}
