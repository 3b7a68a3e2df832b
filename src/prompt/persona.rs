//! Persona styles that prefix a tone instruction onto a prompt.

use serde::{Deserialize, Serialize};

/// Tone the model is asked to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Persona {
    Formal,
    #[default]
    Professional,
    Casual,
    /// No tone instruction.
    None,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::Formal,
        Persona::Professional,
        Persona::Casual,
        Persona::None,
    ];

    /// Parse a display label. Unknown labels mean no persona.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Formal" => Persona::Formal,
            "Professional" => Persona::Professional,
            "Casual" => Persona::Casual,
            _ => Persona::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Formal => "Formal",
            Persona::Professional => "Professional",
            Persona::Casual => "Casual",
            Persona::None => "None",
        }
    }

    /// Instruction placed in front of the prompt.
    pub fn prefix(&self) -> &'static str {
        match self {
            Persona::Formal => "Please respond in a formal tone. ",
            Persona::Professional => "Please answer in a professional manner. ",
            Persona::Casual => "Answer casually: ",
            Persona::None => "",
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Persona {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

/// Prefix the persona's tone instruction onto `prompt`.
pub fn apply_persona(prompt: &str, persona: Persona) -> String {
    format!("{}{}", persona.prefix(), prompt)
}
