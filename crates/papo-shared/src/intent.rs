//! Voice command interpreter.
//!
//! Maps a free-text command to one of a closed set of intents using keyword
//! rules. Rules are checked top to bottom and the first one whose keyword
//! groups are all present wins, so the order of [`RULES`] is part of the
//! behavior.

use serde::{Deserialize, Serialize};

/// Classified meaning of a voice command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Open the residents list
    ListResidents,
    /// Open the new request form
    NewRequest,
    /// Show the user's profile
    Profile,
    /// Explain how the app works
    Help,
    /// Nothing matched
    Unknown,
}

/// Client-side action attached to a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    Navigate { target: String },
    Dialog { content: String },
}

/// What the caller sends back to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub reply: String,
    pub action: Option<Action>,
}

impl Intent {
    pub fn reply(&self) -> &'static str {
        match self {
            Intent::ListResidents => "Vou listar os residentes para você.",
            Intent::NewRequest => "Vou abrir o formulário de nova solicitação.",
            Intent::Profile => "Aqui está seu perfil.",
            Intent::Help => "Vou mostrar como o Papo Social funciona.",
            Intent::Unknown => "Desculpe, não entendi o comando. Pode tentar novamente?",
        }
    }

    /// Navigation target for navigate intents
    pub fn target(&self) -> Option<&'static str> {
        match self {
            Intent::ListResidents => Some("/residents"),
            Intent::NewRequest => Some("/requests/new"),
            Intent::Profile => Some("/profile"),
            Intent::Help | Intent::Unknown => None,
        }
    }

    pub fn action(&self) -> Option<Action> {
        match self {
            Intent::Help => Some(Action::Dialog {
                content: "help_intro".to_string(),
            }),
            _ => self.target().map(|target| Action::Navigate {
                target: target.to_string(),
            }),
        }
    }

    pub fn response(&self) -> CommandResponse {
        CommandResponse {
            reply: self.reply().to_string(),
            action: self.action(),
        }
    }
}

/// A keyword rule: every group must have at least one keyword present
pub struct Rule {
    pub intent: Intent,
    pub requires: &'static [&'static [&'static str]],
}

impl Rule {
    fn matches(&self, lower: &str) -> bool {
        self.requires
            .iter()
            .all(|group| group.iter().any(|kw| lower.contains(kw)))
    }
}

/// Classification rules, in priority order
pub const RULES: &[Rule] = &[
    Rule {
        intent: Intent::ListResidents,
        requires: &[&["listar"], &["residente"]],
    },
    Rule {
        intent: Intent::NewRequest,
        requires: &[&["nova"], &["solicitação", "requisição"]],
    },
    Rule {
        intent: Intent::Profile,
        requires: &[&["perfil", "meus dados"]],
    },
    Rule {
        intent: Intent::Help,
        requires: &[&["ajuda", "como funciona"]],
    },
];

/// Classify `text`. Never fails; unmatched text is [`Intent::Unknown`].
pub fn resolve(text: &str) -> Intent {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Unknown)
}
