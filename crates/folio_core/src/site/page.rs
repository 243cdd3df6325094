//! Serializable view model of the public page.

use crate::model::profile::Profile;
use crate::model::showcase::{Certificate, Project, Skill};
use serde::Serialize;

/// Shown in the about section while no biography has been written.
pub const DEFAULT_ABOUT: &str =
    "Welcome to my portfolio. A full introduction is on its way; in the meantime, have a look at my projects below.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicPage {
    pub hero: Option<Hero>,
    pub about: About,
    pub skills: Vec<SkillGroup>,
    pub projects: Vec<ProjectCard>,
    pub certificates: Vec<CertificateCard>,
    pub contact: ContactDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hero {
    pub full_name: String,
    pub roles: Vec<String>,
    pub tagline: String,
    pub image_url: Option<String>,
}

impl From<&Profile> for Hero {
    fn from(profile: &Profile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            roles: profile.role_list(),
            tagline: profile.tagline.clone(),
            image_url: profile.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct About {
    pub text: String,
    /// True when `text` is the placeholder rather than stored content.
    pub is_default: bool,
}

impl About {
    pub fn from_content(content: Option<&str>) -> Self {
        match content.map(str::trim).filter(|text| !text.is_empty()) {
            Some(text) => Self {
                text: text.to_string(),
                is_default: false,
            },
            None => Self {
                text: DEFAULT_ABOUT.to_string(),
                is_default: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillGroup {
    pub category: String,
    pub skills: Vec<SkillCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCard {
    pub name: String,
    pub description: String,
}

/// Groups skills by category.
///
/// Input order is kept within each group, and groups appear in the order
/// their first skill does.
pub fn group_skills(skills: &[Skill]) -> Vec<SkillGroup> {
    let mut groups: Vec<SkillGroup> = Vec::new();
    for skill in skills {
        let card = SkillCard {
            name: skill.name.clone(),
            description: skill.description.clone(),
        };
        match groups
            .iter_mut()
            .find(|group| group.category == skill.category)
        {
            Some(group) => group.skills.push(card),
            None => groups.push(SkillGroup {
                category: skill.category.clone(),
                skills: vec![card],
            }),
        }
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectCard {
    pub name: String,
    pub role: String,
    pub tools: Vec<String>,
    pub description: String,
    pub impact: String,
    pub image_url: Option<String>,
}

impl From<&Project> for ProjectCard {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            role: project.role.clone(),
            tools: project.tool_list(),
            description: project.description.clone(),
            impact: project.impact.clone(),
            image_url: project.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateCard {
    pub title: String,
    pub organization: String,
    pub year: String,
    pub description: String,
    pub file_url: Option<String>,
}

impl From<&Certificate> for CertificateCard {
    fn from(certificate: &Certificate) -> Self {
        Self {
            title: certificate.title.clone(),
            organization: certificate.organization.clone(),
            year: certificate.year.clone(),
            description: certificate.description.clone(),
            file_url: certificate.file_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
    pub location: String,
}

impl From<&Profile> for ContactDetails {
    fn from(profile: &Profile) -> Self {
        Self {
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            location: profile.location.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{group_skills, About, DEFAULT_ABOUT};
    use crate::model::showcase::Skill;

    #[test]
    fn blank_bio_falls_back_to_default_statement() {
        let about = About::from_content(Some("   \n"));
        assert!(about.is_default);
        assert_eq!(about.text, DEFAULT_ABOUT);
        assert!(!About::from_content(Some("Hello")).is_default);
    }

    #[test]
    fn skills_group_in_first_seen_order() {
        let skills = vec![
            Skill::new("Rust", "", "Languages", 0),
            Skill::new("SQLite", "", "Data", 1),
            Skill::new("Go", "", "Languages", 2),
        ];
        let groups = group_skills(&skills);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "Languages");
        let names: Vec<&str> = groups[0].skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Go"]);
        assert_eq!(groups[1].category, "Data");
    }
}
