//! Server-rendered HTML pages.
//!
//! The markup is deliberately plain: two pages, no client-side code. Every
//! value that originates from the store or from user input passes through
//! [`escape`] before interpolation.

use std::fmt::Write;

use crate::models::User;

/// Renders the aggregate home page.
pub fn home(
    visited: &[String],
    users: &[User],
    current_id: i32,
    color: &str,
    error: Option<&str>,
) -> String {
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n<title>Atlas</title>\n");
    page.push_str("</head>\n");
    let _ = writeln!(
        page,
        "<body style=\"background-color: {}\">",
        escape(color)
    );

    if let Some(code) = error {
        let _ = writeln!(page, "<p class=\"notice\">{}</p>", notice(code));
    }

    let _ = writeln!(page, "<h1>Countries visited: {}</h1>", visited.len());
    page.push_str("<ul class=\"visited\">\n");
    for code in visited {
        let _ = writeln!(page, "<li>{}</li>", escape(code));
    }
    page.push_str("</ul>\n");

    page.push_str(concat!(
        "<form action=\"/add\" method=\"post\">\n",
        "<input type=\"text\" name=\"country\" placeholder=\"Enter country name\" autofocus>\n",
        "<button type=\"submit\">Add</button>\n",
        "</form>\n",
    ));

    page.push_str("<form action=\"/user\" method=\"post\" class=\"travelers\">\n");
    for user in users {
        let current = if user.id == current_id { " class=\"current\"" } else { "" };
        let _ = writeln!(
            page,
            "<button type=\"submit\" name=\"user\" value=\"{}\"{}>{}</button>",
            user.id,
            current,
            escape(&user.name)
        );
    }
    page.push_str("<button type=\"submit\" name=\"add\" value=\"new\">Add traveler</button>\n");
    page.push_str("</form>\n");

    page.push_str("</body>\n</html>\n");
    page
}

/// Renders the traveler creation form.
pub fn new_traveler_form() -> String {
    concat!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
        "<meta charset=\"utf-8\">\n<title>Atlas - new traveler</title>\n",
        "</head>\n<body>\n",
        "<h1>New traveler</h1>\n",
        "<form action=\"/new\" method=\"post\">\n",
        "<input type=\"text\" name=\"name\" placeholder=\"Name\" autofocus>\n",
        "<input type=\"text\" name=\"color\" placeholder=\"Favorite color\">\n",
        "<button type=\"submit\">Create</button>\n",
        "</form>\n",
        "</body>\n</html>\n",
    )
    .to_string()
}

/// Maps a notice code from the redirect query string to display text.
/// Unrecognized codes get a generic line rather than echoing the input.
fn notice(code: &str) -> &'static str {
    match code {
        "unknown-country" => "No country matched that name.",
        "empty-country" => "Type a country name first.",
        _ => "Something went wrong.",
    }
}

/// Minimal HTML escaping for text and double-quoted attribute positions.
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i32, name: &str, color: &str) -> User {
        User {
            id,
            name: name.to_string(),
            color: color.to_string(),
        }
    }

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<b onclick="x('y')">&"#),
            "&lt;b onclick=&quot;x(&#39;y&#39;)&quot;&gt;&amp;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn home_shows_count_color_and_travelers() {
        let visited = vec!["FR".to_string(), "JP".to_string()];
        let users = vec![user(1, "Ada", "teal"), user(2, "Brian", "plum")];
        let page = home(&visited, &users, 2, "plum", None);
        assert!(page.contains("Countries visited: 2"));
        assert!(page.contains("background-color: plum"));
        assert!(page.contains("<li>FR</li>"));
        assert!(page.contains(">Ada</button>"));
        assert!(page.contains("value=\"2\" class=\"current\""));
        assert!(!page.contains("notice"));
    }

    #[test]
    fn home_escapes_stored_values() {
        let users = vec![user(1, "<script>", "red\"")];
        let page = home(&[], &users, 1, "red\"", None);
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("background-color: red&quot;"));
    }

    #[test]
    fn home_renders_notice_for_known_codes() {
        let page = home(&[], &[], 1, "white", Some("unknown-country"));
        assert!(page.contains("No country matched that name."));
        let page = home(&[], &[], 1, "white", Some("whatever"));
        assert!(page.contains("Something went wrong."));
    }

    #[test]
    fn new_traveler_form_posts_to_new() {
        let page = new_traveler_form();
        assert!(page.contains("action=\"/new\""));
        assert!(page.contains("name=\"name\""));
        assert!(page.contains("name=\"color\""));
    }
}
