// Notifier module: Telegram delivery and message formatting.

pub mod format;
pub mod telegram;

pub use telegram::TelegramNotifier;
