use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, Result};

const MESSAGE_EN: &str = "Subject: Iran blackout — don’t let repression happen in the dark

Hello,

I’m writing with urgency about reports of widespread internet and communications disruptions in Iran. When people can’t call, upload, or be reached, abuses become harder to document—and easier to deny.

Please do not treat this as a distant issue. We need clear, public leadership and real pressure. I urge you to:
• Speak out and keep attention on Iran’s blackout and repression
• Support independent reporting and human-rights monitoring
• Back practical measures that help restore connectivity and protect civilians

Every day of silence gives more cover for violence. Please act.

Sincerely,
[Your name]
[City/Country]";

const MESSAGE_SV: &str = "Ämne: Iran stängs ner — låt inte förtryck ske i mörker

Hej,

Jag skriver med stor oro och brådska om rapporter om omfattande störningar i internet och kommunikation i Iran. När människor inte kan ringa, dela information eller ens nå varandra blir övergrepp svårare att dokumentera och lättare att förneka.

Det här får inte behandlas som en avlägsen fråga. Vi behöver tydligt, offentligt ledarskap och verklig press. Jag uppmanar dig att:
• Agera offentligt och hålla fokus på Irans blackout och repression
• Stödja oberoende rapportering och människorättsövervakning
• Ställa dig bakom konkreta åtgärder som återställer uppkoppling och skyddar civila

Varje dag av tystnad ger mer utrymme för våld. Snälla, agera.

Vänliga hälsningar,
[Ditt namn]
[Stad/Land]";

/// Language of the outreach message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    English,
    Swedish,
}

impl Language {
    pub fn label(self) -> &'static str {
        match self {
            Language::English => "Message template (English, editable)",
            Language::Swedish => "Meddelande (svenska, redigerbar)",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Language::English => Language::Swedish,
            Language::Swedish => Language::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => f.write_str("English"),
            Language::Swedish => f.write_str("Svenska"),
        }
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "eng" | "english" => Ok(Language::English),
            "sv" | "se" | "swedish" | "svenska" => Ok(Language::Swedish),
            other => Err(AppError::invalid_selection(format!(
                "Unknown language `{other}`. Use `en` or `sv`."
            ))),
        }
    }
}

/// The static outreach text for `language`, verbatim.
pub fn message_template(language: Language) -> &'static str {
    match language {
        Language::English => MESSAGE_EN,
        Language::Swedish => MESSAGE_SV,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_are_distinct_and_non_empty() {
        let en = message_template(Language::English);
        let sv = message_template(Language::Swedish);
        assert!(!en.trim().is_empty());
        assert!(!sv.trim().is_empty());
        assert_ne!(en, sv);
        assert!(en.starts_with("Subject:"));
        assert!(sv.starts_with("Ämne:"));
    }

    #[test]
    fn parses_language_codes() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::English);
        assert_eq!("svenska".parse::<Language>().unwrap(), Language::Swedish);
        let err = "fa".parse::<Language>().expect_err("unsupported");
        assert!(matches!(err, AppError::InvalidSelection(_)));
    }

    #[test]
    fn toggle_flips_between_languages() {
        assert_eq!(Language::English.toggle(), Language::Swedish);
        assert_eq!(Language::English.toggle().toggle(), Language::English);
    }
}
