use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A face cluster as reported by `GET /persons`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "personId")]
    pub person_id: String,
    #[serde(rename = "photoCount", default)]
    pub photo_count: u32,
    #[serde(rename = "repThumbKey", default, deserialize_with = "null_as_default")]
    pub rep_thumb_key: String,
    #[serde(rename = "repThumbURL", default, deserialize_with = "null_as_default")]
    pub rep_thumb_url: String,
}

impl Person {
    /// Case-insensitive substring match on the person id.
    /// `query` must already be lowercase.
    pub fn matches_search(&self, query: &str) -> bool {
        self.person_id.to_lowercase().contains(query)
    }

    pub fn photo_count_display(&self) -> String {
        match self.photo_count {
            1 => "1 photo".to_string(),
            n => format!("{} photos", n),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonsResponse {
    #[serde(default)]
    pub persons: Vec<Person>,
}

/// Ordering of the persons listing by photo count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Descending => SortOrder::Ascending,
            SortOrder::Ascending => SortOrder::Descending,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Descending => "Photo count (high to low)",
            SortOrder::Ascending => "Photo count (low to high)",
        }
    }

    pub fn compare(&self, a: &Person, b: &Person) -> Ordering {
        match self {
            SortOrder::Descending => b.photo_count.cmp(&a.photo_count),
            SortOrder::Ascending => a.photo_count.cmp(&b.photo_count),
        }
    }
}

/// Filter `persons` by `query` and sort what remains by photo count.
///
/// A blank query disables filtering. The sort is stable, so persons with equal
/// counts keep their backend order. The input slice is never reordered.
pub fn filter_and_sort<'a>(persons: &'a [Person], query: &str, order: SortOrder) -> Vec<&'a Person> {
    let mut result: Vec<&Person> = persons.iter().collect();

    if !query.trim().is_empty() {
        let query = query.to_lowercase();
        result.retain(|p| p.matches_search(&query));
    }

    result.sort_by(|a, b| order.compare(a, b));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str, count: u32) -> Person {
        Person {
            person_id: id.to_string(),
            photo_count: count,
            rep_thumb_key: format!("thumbs/{}.jpg", id),
            rep_thumb_url: format!("https://thumbs.example/{}.jpg", id),
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let persons = vec![person("abc123", 1), person("xyz", 2)];
        let ids: Vec<&str> = filter_and_sort(&persons, "abc", SortOrder::Descending)
            .iter()
            .map(|p| p.person_id.as_str())
            .collect();
        assert_eq!(ids, vec!["abc123"]);

        let upper = filter_and_sort(&persons, "ABC", SortOrder::Descending);
        assert_eq!(upper.len(), 1);
    }

    #[test]
    fn test_blank_query_keeps_everything() {
        let persons = vec![person("a", 1), person("b", 2)];
        assert_eq!(filter_and_sort(&persons, "   ", SortOrder::Ascending).len(), 2);
        assert_eq!(filter_and_sort(&persons, "", SortOrder::Ascending).len(), 2);
    }

    #[test]
    fn test_sort_by_photo_count() {
        let persons = vec![person("a", 3), person("b", 9), person("c", 1)];

        let desc: Vec<u32> = filter_and_sort(&persons, "", SortOrder::Descending)
            .iter()
            .map(|p| p.photo_count)
            .collect();
        assert_eq!(desc, vec![9, 3, 1]);

        let asc: Vec<u32> = filter_and_sort(&persons, "", SortOrder::Ascending)
            .iter()
            .map(|p| p.photo_count)
            .collect();
        assert_eq!(asc, vec![1, 3, 9]);

        // Source order untouched
        assert_eq!(persons[0].person_id, "a");
    }

    #[test]
    fn test_sort_is_stable_for_equal_counts() {
        let persons = vec![person("first", 2), person("second", 2), person("third", 5)];
        let ids: Vec<&str> = filter_and_sort(&persons, "", SortOrder::Descending)
            .iter()
            .map(|p| p.person_id.as_str())
            .collect();
        assert_eq!(ids, vec!["third", "first", "second"]);
    }

    #[test]
    fn test_sort_order_toggle() {
        assert_eq!(SortOrder::default(), SortOrder::Descending);
        assert_eq!(SortOrder::Descending.toggle(), SortOrder::Ascending);
        assert_eq!(SortOrder::Ascending.toggle(), SortOrder::Descending);
    }

    #[test]
    fn test_parse_persons_response_with_nulls() {
        let json = r#"{"persons": [
            {"personId": "p-1", "photoCount": 4, "repThumbKey": "t/1.jpg", "repThumbURL": "https://x/1"},
            {"personId": "p-2", "photoCount": 0, "repThumbKey": null, "repThumbURL": null}
        ]}"#;

        let resp: PersonsResponse = serde_json::from_str(json).expect("Failed to parse persons JSON");
        assert_eq!(resp.persons.len(), 2);
        assert_eq!(resp.persons[0].rep_thumb_url, "https://x/1");
        assert_eq!(resp.persons[1].rep_thumb_key, "");
        assert_eq!(resp.persons[1].rep_thumb_url, "");
        assert_eq!(resp.persons[1].photo_count_display(), "0 photos");
    }
}
