use serde::{Deserialize, Serialize};

use crate::domain::idea::{IdeaStatus, TestIdea};
use crate::domain::ids::IdeaId;
use crate::error::{CoreError, Result};

// ===== Query =====

/// Sort order for backlog listings. All keys sort descending, so the
/// most interesting ideas come first.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum IdeaSort {
    #[default]
    IceScore,
    CreatedAt,
    ExpectedImprovement,
}

impl std::str::FromStr for IdeaSort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ice" | "ice-score" => Ok(IdeaSort::IceScore),
            "created" | "created-at" => Ok(IdeaSort::CreatedAt),
            "improvement" | "expected-improvement" => Ok(IdeaSort::ExpectedImprovement),
            other => Err(format!(
                "Unknown sort key '{}' (expected ice, created or improvement)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdeaQuery {
    pub status: Option<IdeaStatus>,
    pub name_contains: Option<String>,
    pub sort: IdeaSort,
}

impl IdeaQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: IdeaStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    pub fn with_sort(mut self, sort: IdeaSort) -> Self {
        self.sort = sort;
        self
    }

    fn matches(&self, idea: &TestIdea) -> bool {
        if let Some(status) = self.status {
            if idea.status != status {
                return false;
            }
        }
        if let Some(ref needle) = self.name_contains {
            if !idea
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

// ===== Backlog =====

/// Ordered collection of test ideas. Mutations that touch the ICE factors
/// go through [`TestIdea::set_factors`] so the derived score stays correct.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Backlog {
    ideas: Vec<TestIdea>,
}

impl Backlog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, idea: TestIdea) -> Result<IdeaId> {
        if self.ideas.iter().any(|existing| existing.id == idea.id) {
            return Err(CoreError::AlreadyExists(format!("idea {}", idea.id)));
        }
        let id = idea.id;
        self.ideas.push(idea);
        Ok(id)
    }

    pub fn get(&self, id: &IdeaId) -> Option<&TestIdea> {
        self.ideas.iter().find(|idea| &idea.id == id)
    }

    pub fn get_mut(&mut self, id: &IdeaId) -> Option<&mut TestIdea> {
        self.ideas.iter_mut().find(|idea| &idea.id == id)
    }

    pub fn remove(&mut self, id: &IdeaId) -> Result<TestIdea> {
        let pos = self
            .ideas
            .iter()
            .position(|idea| &idea.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("idea {}", id)))?;
        Ok(self.ideas.remove(pos))
    }

    /// Update the ICE factors of one idea, recomputing its score.
    pub fn update_factors(
        &mut self,
        id: &IdeaId,
        impact: u8,
        confidence: u8,
        ease: u8,
    ) -> Result<&TestIdea> {
        let idea = self
            .ideas
            .iter_mut()
            .find(|idea| &idea.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("idea {}", id)))?;
        idea.set_factors(impact, confidence, ease)?;
        Ok(idea)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestIdea> {
        self.ideas.iter()
    }

    pub fn as_slice(&self) -> &[TestIdea] {
        &self.ideas
    }

    pub fn len(&self) -> usize {
        self.ideas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ideas.is_empty()
    }

    /// Filter and sort ideas for a listing.
    pub fn query(&self, query: &IdeaQuery) -> Vec<&TestIdea> {
        let mut matched: Vec<&TestIdea> = self
            .ideas
            .iter()
            .filter(|idea| query.matches(idea))
            .collect();

        match query.sort {
            IdeaSort::IceScore => matched.sort_by(|a, b| b.ice_score.cmp(&a.ice_score)),
            IdeaSort::CreatedAt => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            IdeaSort::ExpectedImprovement => matched.sort_by(|a, b| {
                b.expected_improvement.total_cmp(&a.expected_improvement)
            }),
        }

        matched
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl FromIterator<TestIdea> for Backlog {
    fn from_iter<I: IntoIterator<Item = TestIdea>>(iter: I) -> Self {
        Self {
            ideas: iter.into_iter().collect(),
        }
    }
}
