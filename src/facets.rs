//! Facet extraction and refinement over an already-fetched result set.
//!
//! These are pure functions over `data` returned by the search endpoint; they
//! never call the store. Fields are read from the conventional `metadata`
//! object and tolerate missing or oddly-typed values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Payload, SearchHit};

/// Distinct values available for each facet, sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FacetOptions {
    pub locations: Vec<String>,
    pub roles: Vec<String>,
    pub skills: Vec<String>,
    pub min_experience: Option<f64>,
    pub max_experience: Option<f64>,
}

/// Facets picked by the user. Unset fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FacetSelection {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub min_experience: Option<f64>,
    #[serde(default)]
    pub skills: Vec<String>,
}

fn metadata(payload: &Payload) -> Option<&serde_json::Map<String, Value>> {
    payload.get("metadata")?.as_object()
}

fn text_field(payload: &Payload, field: &str) -> Option<String> {
    match metadata(payload)?.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn experience(payload: &Payload) -> Option<f64> {
    match metadata(payload)?.get("years_of_experience")? {
        Value::Number(n) => n.as_f64(),
        // extracted metadata sometimes carries "5+" or "5 years"
        Value::String(s) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

fn skills(payload: &Payload) -> Vec<String> {
    metadata(payload)
        .and_then(|m| m.get("skills"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Skills differing only in case collapse to the first spelling seen.
pub fn collect(hits: &[SearchHit]) -> FacetOptions {
    let mut locations = BTreeSet::new();
    let mut roles = BTreeSet::new();
    let mut all_skills: BTreeMap<String, String> = BTreeMap::new();
    let mut min_experience: Option<f64> = None;
    let mut max_experience: Option<f64> = None;

    for hit in hits {
        if let Some(loc) = text_field(&hit.payload, "location") {
            locations.insert(loc);
        }
        if let Some(role) = text_field(&hit.payload, "current_role") {
            roles.insert(role);
        }
        for skill in skills(&hit.payload) {
            all_skills.entry(skill.to_lowercase()).or_insert(skill);
        }
        if let Some(years) = experience(&hit.payload) {
            min_experience = Some(min_experience.map_or(years, |m| m.min(years)));
            max_experience = Some(max_experience.map_or(years, |m| m.max(years)));
        }
    }

    FacetOptions {
        locations: locations.into_iter().collect(),
        roles: roles.into_iter().collect(),
        skills: all_skills.into_values().collect(),
        min_experience,
        max_experience,
    }
}

impl FacetSelection {
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.role.is_none()
            && self.min_experience.is_none()
            && self.skills.is_empty()
    }

    pub fn accepts(&self, payload: &Payload) -> bool {
        if let Some(loc) = &self.location {
            if text_field(payload, "location").as_deref() != Some(loc.as_str()) {
                return false;
            }
        }
        if let Some(role) = &self.role {
            if text_field(payload, "current_role").as_deref() != Some(role.as_str()) {
                return false;
            }
        }
        if let Some(min) = self.min_experience {
            if !experience(payload).is_some_and(|y| y >= min) {
                return false;
            }
        }
        if !self.skills.is_empty() {
            let have = skills(payload);
            if !self
                .skills
                .iter()
                .all(|want| have.iter().any(|s| s.eq_ignore_ascii_case(want)))
            {
                return false;
            }
        }
        true
    }
}

/// Keep hits matching every selected facet, in their original order.
pub fn refine(hits: &[SearchHit], selection: &FacetSelection) -> Vec<SearchHit> {
    if selection.is_empty() {
        return hits.to_vec();
    }
    hits.iter()
        .filter(|h| selection.accepts(&h.payload))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PointId;
    use serde_json::json;

    fn hit(id: u64, score: f32, metadata: Value) -> SearchHit {
        SearchHit {
            id: PointId::Num(id),
            score,
            payload: json!({ "metadata": metadata }).as_object().cloned().unwrap(),
        }
    }

    fn sample() -> Vec<SearchHit> {
        vec![
            hit(1, 0.9, json!({"location": "Remote", "current_role": "Backend Engineer",
                               "years_of_experience": 6, "skills": ["Python", "Rust"]})),
            hit(2, 0.8, json!({"location": "Berlin", "current_role": "Designer",
                               "years_of_experience": "3+", "skills": ["Figma"]})),
            hit(3, 0.7, json!({"location": "Remote", "current_role": null,
                               "years_of_experience": null, "skills": ["python", "Go"]})),
        ]
    }

    #[test]
    fn test_collect_facets() {
        let facets = collect(&sample());
        assert_eq!(facets.locations, vec!["Berlin", "Remote"]);
        assert_eq!(facets.roles, vec!["Backend Engineer", "Designer"]);
        assert_eq!(facets.skills, vec!["Figma", "Go", "Python", "Rust"]);
        assert_eq!(facets.min_experience, Some(3.0));
        assert_eq!(facets.max_experience, Some(6.0));
    }

    #[test]
    fn test_collected_skill_refines_every_spelling() {
        let hits = sample();
        let facets = collect(&hits);
        let python: Vec<&String> = facets
            .skills
            .iter()
            .filter(|s| s.eq_ignore_ascii_case("python"))
            .collect();
        assert_eq!(python.len(), 1);

        let selection = FacetSelection {
            skills: vec![python[0].clone()],
            ..Default::default()
        };
        let ids: Vec<PointId> = refine(&hits, &selection).iter().map(|h| h.id.clone()).collect();
        assert_eq!(ids, vec![PointId::Num(1), PointId::Num(3)]);
    }

    #[test]
    fn test_refine_preserves_order() {
        let selection = FacetSelection {
            location: Some("Remote".to_string()),
            skills: vec!["PYTHON".to_string()],
            ..Default::default()
        };
        let refined = refine(&sample(), &selection);
        let ids: Vec<PointId> = refined.iter().map(|h| h.id.clone()).collect();
        assert_eq!(ids, vec![PointId::Num(1), PointId::Num(3)]);
    }

    #[test]
    fn test_min_experience_excludes_unknown() {
        let selection = FacetSelection {
            min_experience: Some(2.0),
            ..Default::default()
        };
        let refined = refine(&sample(), &selection);
        assert_eq!(refined.len(), 2);
        assert!(refined.iter().all(|h| h.id != PointId::Num(3)));
    }

    #[test]
    fn test_empty_selection_keeps_everything() {
        assert_eq!(refine(&sample(), &FacetSelection::default()).len(), 3);
        assert_eq!(collect(&[]), FacetOptions::default());
    }
}
