use std::fmt;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

static OBFUSCATED_EMAIL_CHARS: AtomicUsize = AtomicUsize::new(0);

/// Set how many leading characters of an email's local part stay readable in
/// logs. Until this is called every local part is fully masked.
pub fn set_obfuscated_email_chars(visible: usize) {
    OBFUSCATED_EMAIL_CHARS.store(visible, Ordering::Relaxed);
}

/// Email address rendered for logs with most of the local part masked.
///
/// With two visible characters `alice@example.com` is written as
/// `al***@example.com`, with none as `*****@example.com`. Values without an
/// `@` are masked entirely.
pub struct ObfuscatedEmail<'a> {
    email: &'a str,
    visible: usize,
}

impl<'a> ObfuscatedEmail<'a> {
    /// Wrap `email` using the process-wide visible length.
    pub fn new(email: &'a str) -> Self {
        Self::with_visible_chars(email, OBFUSCATED_EMAIL_CHARS.load(Ordering::Relaxed))
    }

    pub fn with_visible_chars(email: &'a str, visible: usize) -> Self {
        Self { email, visible }
    }
}

impl fmt::Display for ObfuscatedEmail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((local, domain)) = self.email.split_once('@') else {
            return f.write_str(&"*".repeat(self.email.chars().count()));
        };

        let visible: String = local.chars().take(self.visible).collect();
        let hidden = local.chars().count().saturating_sub(self.visible);

        write!(f, "{}{}@{}", visible, "*".repeat(hidden), domain)
    }
}

impl fmt::Debug for ObfuscatedEmail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
