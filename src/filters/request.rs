//! Per-request guard.

/// Query variables that request a print view.
const PRINT_QUERY_VARS: &[&str] = &["print", "printpage"];

/// What is known about the current request.
///
/// Any of these flags makes every filter a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Lazy loading switched off for this request by the host.
    pub disabled: bool,
    pub admin: bool,
    pub feed: bool,
    pub amp: bool,
    pub preview: bool,
    pub customize_preview: bool,
    /// A print view was requested (`?print` or `?printpage`).
    pub print: bool,
}

impl RequestContext {
    /// Mark the request as a print view if a print query variable equals 1.
    pub fn with_query<'q>(mut self, vars: impl IntoIterator<Item = (&'q str, &'q str)>) -> Self {
        self.print |= vars.into_iter().any(|(key, value)| {
            PRINT_QUERY_VARS.iter().any(|v| v.eq_ignore_ascii_case(key)) && leading_int(value) == 1
        });
        self
    }

    pub fn should_skip(&self) -> bool {
        self.disabled
            || self.admin
            || self.feed
            || self.amp
            || self.preview
            || self.customize_preview
            || self.print
    }
}

/// Integer prefix of a query value, 0 when there is none.
fn leading_int(value: &str) -> i64 {
    let value = value.trim();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_processes() {
        assert!(!RequestContext::default().should_skip());
    }

    #[test]
    fn test_each_flag_skips() {
        let flags: [fn(&mut RequestContext); 7] = [
            |r| r.disabled = true,
            |r| r.admin = true,
            |r| r.feed = true,
            |r| r.amp = true,
            |r| r.preview = true,
            |r| r.customize_preview = true,
            |r| r.print = true,
        ];
        for set in flags {
            let mut request = RequestContext::default();
            set(&mut request);
            assert!(request.should_skip(), "{request:?}");
        }
    }

    #[test]
    fn test_print_query_vars() {
        let print = |vars: &[(&'static str, &'static str)]| {
            RequestContext::default().with_query(vars.iter().copied()).should_skip()
        };
        assert!(print(&[("page", "2"), ("printpage", "1")]));
        assert!(print(&[("PRINT", "1abc")]));
        assert!(!print(&[("print", "0")]));
        assert!(!print(&[("print", "")]));
        assert!(!print(&[("printpage", "-1")]));
        assert!(!print(&[("p", "1"), ("paged", "1")]));
    }
}
