use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::coercion::{CoercionError, OutputSchema};

pub const MIN_SKILL_RATING: u8 = 1;
pub const MAX_SKILL_RATING: u8 = 5;
pub const MAX_GPA: f64 = 4.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Socials {
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub twitter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub socials: Socials,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    /// 1 (mentioned once) to 5 (core strength).
    pub rating: u8,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub url: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub gpa: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: NaiveDate,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub title: String,
    pub issuer: String,
    pub date: NaiveDate,
    pub description: Option<String>,
}

/// A user's resume data. The AI layer only ever borrows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub awards: Vec<Award>,
}

impl Profile {
    /// Replaces every section present in `update`; absent sections are kept.
    pub fn merge(&mut self, update: ParsedProfile) {
        let ParsedProfile {
            personal_info,
            skills,
            experience,
            projects,
            education,
            certifications,
            awards,
        } = update;

        if let Some(personal_info) = personal_info {
            self.personal_info = personal_info;
        }
        if let Some(skills) = skills {
            self.skills = skills;
        }
        if let Some(experience) = experience {
            self.experience = experience;
        }
        if let Some(projects) = projects {
            self.projects = projects;
        }
        if let Some(education) = education {
            self.education = education;
        }
        if let Some(certifications) = certifications {
            self.certifications = certifications;
        }
        if let Some(awards) = awards {
            self.awards = awards;
        }
    }
}

impl OutputSchema for Profile {
    fn validate(&self) -> Result<(), CoercionError> {
        validate_skills(&self.skills)?;
        validate_education(&self.education)
    }
}

/// A partial profile: what resume parsing produces and what a profile update
/// carries. Every section is optional; entries inside a section keep their
/// required fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<Skill>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<Experience>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Education>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<Certification>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awards: Option<Vec<Award>>,
}

impl OutputSchema for ParsedProfile {
    fn validate(&self) -> Result<(), CoercionError> {
        if let Some(skills) = &self.skills {
            validate_skills(skills)?;
        }
        if let Some(education) = &self.education {
            validate_education(education)?;
        }
        Ok(())
    }
}

fn validate_skills(skills: &[Skill]) -> Result<(), CoercionError> {
    for (i, skill) in skills.iter().enumerate() {
        if !(MIN_SKILL_RATING..=MAX_SKILL_RATING).contains(&skill.rating) {
            return Err(CoercionError::schema(
                format!("skills[{i}].rating"),
                format!(
                    "rating {} is outside {MIN_SKILL_RATING}-{MAX_SKILL_RATING}",
                    skill.rating
                ),
            ));
        }
    }
    Ok(())
}

fn validate_education(education: &[Education]) -> Result<(), CoercionError> {
    for (i, entry) in education.iter().enumerate() {
        if let Some(gpa) = entry.gpa {
            if !(0.0..=MAX_GPA).contains(&gpa) {
                return Err(CoercionError::schema(
                    format!("education[{i}].gpa"),
                    format!("gpa {gpa} is outside 0-{MAX_GPA}"),
                ));
            }
        }
    }
    Ok(())
}
