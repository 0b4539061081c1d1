use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::binder::Trigger;

/// The page content the viewer renders: hero, about, skills, project cards,
/// and contact details. Loaded from YAML, with a built-in sample portfolio
/// as the fallback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Portfolio {
    #[serde(default)]
    pub hero: Hero,
    /// Markdown body for the about section.
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub contact: Contact,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Hero {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub blurb: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Raw video source for the live-demo trigger: a file path or a hosted
    /// watch URL. Absent means the card has no demo.
    #[serde(default)]
    pub demo_video: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Contact {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub socials: Vec<Link>,
}

impl Portfolio {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("read portfolio file {}", path.display()))?;
        let portfolio: Portfolio = serde_yaml::from_str(&data)
            .with_context(|| format!("parse portfolio file {}", path.display()))?;
        Ok(portfolio)
    }

    /// Every project card is a potential modal trigger; cards without a
    /// demo_video still bind and log on activation, mirroring a live-demo
    /// link missing its attribute.
    pub fn triggers(&self) -> Vec<Trigger> {
        self.projects
            .iter()
            .map(|project| Trigger {
                id: project.id.clone(),
                source: project.demo_video.clone(),
            })
            .collect()
    }

    /// Category names in first-seen order, for the filter bar.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for project in &self.projects {
            for category in &project.categories {
                let category = category.trim().to_lowercase();
                if !category.is_empty() && !seen.contains(&category) {
                    seen.push(category);
                }
            }
        }
        seen
    }

    /// Built-in demo content used when no portfolio file is configured.
    pub fn sample() -> Self {
        Portfolio {
            hero: Hero {
                title: "Hi, I build things.".to_string(),
                subtitle: "Software engineer · systems, tools, and the occasional game"
                    .to_string(),
            },
            about: "I am a software engineer who enjoys small sharp tools.\n\n\
                    This viewer is itself one of them: a portfolio you can read \
                    *without leaving the terminal*, demo videos included."
                .to_string(),
            skills: vec![
                Skill {
                    name: "Rust".to_string(),
                    blurb: "CLI tools, TUIs, network services".to_string(),
                },
                Skill {
                    name: "Video pipelines".to_string(),
                    blurb: "Encoding, packaging, playback".to_string(),
                },
                Skill {
                    name: "Web".to_string(),
                    blurb: "Static sites that load fast".to_string(),
                },
            ],
            projects: vec![
                Project {
                    id: "train-sim".to_string(),
                    title: "Train Simulator".to_string(),
                    description: "Physics-accurate train driving with a scriptable signal box."
                        .to_string(),
                    categories: vec!["games".to_string(), "simulation".to_string()],
                    demo_video: Some("videos/train_demo.mp4".to_string()),
                    links: vec![Link {
                        label: "Source".to_string(),
                        url: "https://github.com/example/train-sim".to_string(),
                    }],
                },
                Project {
                    id: "folio-tui".to_string(),
                    title: "Folio TUI".to_string(),
                    description: "This very portfolio viewer.".to_string(),
                    categories: vec!["tools".to_string()],
                    demo_video: Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()),
                    links: Vec::new(),
                },
                Project {
                    id: "shader-garden".to_string(),
                    title: "Shader Garden".to_string(),
                    description: "Procedural plants grown entirely on the GPU.".to_string(),
                    categories: vec!["graphics".to_string()],
                    demo_video: None,
                    links: vec![Link {
                        label: "Write-up".to_string(),
                        url: "https://example.com/shader-garden".to_string(),
                    }],
                },
            ],
            contact: Contact {
                email: "hello@example.com".to_string(),
                location: "Somewhere on Earth".to_string(),
                socials: vec![Link {
                    label: "GitHub".to_string(),
                    url: "https://github.com/example".to_string(),
                }],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn sample_has_triggers_for_every_project() {
        let portfolio = Portfolio::sample();
        let triggers = portfolio.triggers();
        assert_eq!(triggers.len(), portfolio.projects.len());
        assert!(triggers.iter().any(|t| t.source.is_none()));
    }

    #[test]
    fn categories_are_deduped_in_first_seen_order() {
        let mut portfolio = Portfolio::sample();
        portfolio.projects[2].categories = vec!["Games".to_string()];
        assert_eq!(portfolio.categories(), vec!["games", "simulation", "tools"]);
    }

    #[test]
    fn loads_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "hero:\n  title: Test\nprojects:\n  - id: p1\n    title: One\n    demo_video: videos/one.webm\n"
        )
        .unwrap();
        let portfolio = Portfolio::load(file.path()).unwrap();
        assert_eq!(portfolio.hero.title, "Test");
        assert_eq!(
            portfolio.projects[0].demo_video.as_deref(),
            Some("videos/one.webm")
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Portfolio::load(Path::new("/nonexistent/portfolio.yaml")).is_err());
    }
}
