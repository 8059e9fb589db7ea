//! System instruction sent ahead of every conversation.

/// Language/script families the assistant mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFamily {
    English,
    Hinglish,
    Hindi,
}

impl LanguageFamily {
    pub const ALL: [LanguageFamily; 3] = [
        LanguageFamily::English,
        LanguageFamily::Hinglish,
        LanguageFamily::Hindi,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LanguageFamily::English => "English",
            LanguageFamily::Hinglish => "Hinglish",
            LanguageFamily::Hindi => "Hindi",
        }
    }
}

/// Build the fixed system instruction for an assistant called `name`.
///
/// `persona` lines are appended verbatim after the built-in persona.
pub fn system_instruction(name: &str, persona: Option<&str>) -> String {
    let families = LanguageFamily::ALL
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join("/");

    let mut text = format!(
        "You are {name}, an AI voice assistant acting as a technical mentor, problem solver \
         and learning companion.\n\
         Tone: professional but relaxed, honest and straight to the point.\n\n\
         Instructions:\n\
         1. Detect the language and script of the user's message ({families}).\n"
    );
    for (i, family) in LanguageFamily::ALL.iter().enumerate() {
        text.push_str(&format!(
            "{}. If the user writes in {} -> reply in {}.\n",
            i + 2,
            family.name(),
            family.name().to_uppercase()
        ));
    }
    text.push_str(&format!(
        "{}. Format answers with Markdown and keep them concise; they may be read aloud.\n\
         {}. Always identify yourself as {name} when relevant.\n",
        LanguageFamily::ALL.len() + 2,
        LanguageFamily::ALL.len() + 3,
    ));

    if let Some(persona) = persona.map(str::trim).filter(|p| !p.is_empty()) {
        text.push('\n');
        text.push_str(persona);
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_assistant_and_every_language() {
        let text = system_instruction("Nova", None);
        assert!(text.starts_with("You are Nova,"));
        for family in LanguageFamily::ALL {
            assert!(text.contains(&format!("writes in {}", family.name())));
        }
        assert!(text.contains("5. Format answers"));
    }

    #[test]
    fn persona_is_appended() {
        let text = system_instruction("Nova", Some("  Created by the Nova team.  "));
        assert!(text.trim_end().ends_with("Created by the Nova team."));
        assert_eq!(system_instruction("Nova", Some("   ")), system_instruction("Nova", None));
    }
}
