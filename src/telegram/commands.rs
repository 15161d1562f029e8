//! Bot command parsing and reply texts.

use std::sync::LazyLock;

use regex::Regex;

static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/([A-Za-z0-9_]+)(?:@\w+)?(?:\s|$)")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Register,
    Unregister,
    Status,
    Summary,
    Unknown(String),
}

impl Command {
    /// Parses the leading `/command` (optionally `/command@botname`).
    /// Returns `None` for text that is not a command.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let captures = COMMAND_RE.captures(text.trim_start())?;
        let name = captures.get(1)?.as_str().to_ascii_lowercase();

        Some(match name.as_str() {
            "start" | "help" => Command::Start,
            "register" => Command::Register,
            "unregister" => Command::Unregister,
            "status" => Command::Status,
            "summary" => Command::Summary,
            _ => Command::Unknown(name),
        })
    }
}

pub const HELP_TEXT: &str = "👋 ¡Bienvenido al Bot del BOE!\n\n\
Comandos disponibles:\n\
• /register - Suscribirse al resumen diario\n\
• /unregister - Cancelar suscripción\n\
• /summary - Obtener el resumen de hoy ahora\n\
• /status - Ver estado de tu suscripción";

pub const SUMMARY_PENDING_TEXT: &str = "⏳ Obteniendo resumen del BOE de hoy...";

pub const NOT_PUBLISHED_TEXT: &str = "❌ No se pudo obtener el resumen.\n\
El BOE de hoy puede no estar disponible todavía.";

pub const UNREGISTERED_TEXT: &str = "👋 Te has dado de baja correctamente.\n\
Ya no recibirás el resumen diario.\n\n\
Puedes volver a suscribirte cuando quieras con /register.";

pub const NOT_SUBSCRIBED_TEXT: &str = "ℹ️ No estás suscrito actualmente.\nUsa /register para suscribirte.";

pub const STATUS_NOT_SUBSCRIBED_TEXT: &str = "❌ No estás suscrito.\nUsa /register para suscribirte.";

#[must_use]
pub fn registered_text(send_time: &str) -> String {
    format!(
        "🎉 ¡Te has suscrito correctamente!\n\n\
         Recibirás el resumen del BOE cada día a las {send_time}.\n\
         Usa /unregister para cancelar en cualquier momento."
    )
}

#[must_use]
pub fn already_registered_text(send_time: &str) -> String {
    format!(
        "✅ Ya estás suscrito al resumen diario del BOE.\n\
         Recibirás el resumen cada día a las {send_time}."
    )
}

#[must_use]
pub fn status_subscribed_text(send_time: &str) -> String {
    format!("✅ Estás suscrito al resumen diario.\n📅 Hora de envío: {send_time}")
}

#[must_use]
pub fn error_text(reason: &str) -> String {
    format!("❌ Error: {reason}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/help"), Some(Command::Start));
        assert_eq!(Command::parse("  /Register  "), Some(Command::Register));
        assert_eq!(Command::parse("/unregister"), Some(Command::Unregister));
        assert_eq!(Command::parse("/status extra args"), Some(Command::Status));
        assert_eq!(Command::parse("/summary@BoeDigestBot"), Some(Command::Summary));
    }

    #[test]
    fn unknown_and_plain_text() {
        assert_eq!(
            Command::parse("/weather"),
            Some(Command::Unknown("weather".to_string()))
        );
        assert_eq!(Command::parse("hola"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("/"), None);
        assert_eq!(Command::parse("/start-now"), None);
    }

    #[test]
    fn reply_texts_mention_send_time() {
        assert!(registered_text("10:00").contains("10:00"));
        assert!(already_registered_text("07:30").contains("07:30"));
        assert!(status_subscribed_text("10:00").ends_with("10:00"));
    }
}
