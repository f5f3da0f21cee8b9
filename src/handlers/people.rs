use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use tera::{Context, Tera};

use crate::models::Leaderboard;
use crate::services::{LeaderboardService, LeaderboardSnapshot};

const TEMPLATE_NAME: &str = "people.html";
const TEMPLATE: &str = include_str!("../../templates/people.html");

// ============ View Models ============

#[derive(Debug, Serialize)]
struct Section {
    title: String,
    people: Vec<PersonCard>,
}

#[derive(Debug, Serialize)]
struct PersonCard {
    login: String,
    description: String,
    profile_url: String,
    avatar_url: String,
}

impl PersonCard {
    fn new(login: &str, description: String) -> Self {
        Self {
            login: login.to_string(),
            description,
            profile_url: format!("https://github.com/{}", login),
            avatar_url: format!("https://github.com/{}.png", login),
        }
    }
}

fn describe(count: usize, singular: &str, plural: &str) -> String {
    if count > 1 {
        format!("{} {}", count, plural)
    } else {
        format!("1 {}", singular)
    }
}

fn cards(board: &Leaderboard, singular: &str, plural: &str) -> Vec<PersonCard> {
    board
        .entries()
        .iter()
        .map(|e| PersonCard::new(&e.login, describe(e.count, singular, plural)))
        .collect()
}

/// Like tera's default escaping, but leaves `/` alone so URLs stay readable
fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            _ => output.push(c),
        }
    }
    output
}

/// Renders the contributor widget from a snapshot
pub struct WidgetRenderer {
    tera: Tera,
}

impl WidgetRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.set_escape_fn(escape_html);
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { tera })
    }

    pub fn render(&self, snapshot: &LeaderboardSnapshot) -> Result<String, tera::Error> {
        let sections = vec![
            Section {
                title: format!("Most merged pull requests in the last {} days", snapshot.days),
                people: cards(&snapshot.pull_requests, "PR", "PRs"),
            },
            Section {
                title: format!("Most replies in discussions in the last {} days", snapshot.days),
                people: cards(&snapshot.replies, "reply", "replies"),
            },
        ];

        let mut context = Context::new();
        context.insert("sections", &sections);
        self.tera.render(TEMPLATE_NAME, &context)
    }
}

// ============ Widget Handler ============

/// GET /
/// Contributor cards for merged pull requests and discussion replies
pub async fn show_people(
    service: web::Data<LeaderboardService>,
    renderer: web::Data<WidgetRenderer>,
) -> Result<impl Responder, actix_web::Error> {
    let snapshot = service.snapshot();

    let html = renderer.render(&snapshot).map_err(|e| {
        log::error!("Failed to render people widget: {}", e);
        actix_web::error::ErrorInternalServerError("Failed to render page")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> LeaderboardSnapshot {
        LeaderboardSnapshot {
            days: 10,
            replies: Leaderboard::from_logins(["bob", "bob", "<carol>"]),
            pull_requests: Leaderboard::from_logins(["alice"]),
            ..Default::default()
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(1, "PR", "PRs"), "1 PR");
        assert_eq!(describe(4, "PR", "PRs"), "4 PRs");
        assert_eq!(describe(2, "reply", "replies"), "2 replies");
    }

    #[test]
    fn test_render_sections_and_cards() {
        let html = WidgetRenderer::new().unwrap().render(&snapshot()).unwrap();

        let pr_heading = html
            .find("Most merged pull requests in the last 10 days")
            .unwrap();
        let reply_heading = html
            .find("Most replies in discussions in the last 10 days")
            .unwrap();
        assert!(pr_heading < reply_heading);

        assert!(html.contains(r#"href="https://github.com/alice""#));
        assert!(html.contains(r#"src="https://github.com/alice.png""#));
        assert!(html.contains("1 PR<"));
        assert!(html.contains("2 replies"));
        assert!(html.contains("1 reply<"));
    }

    #[test]
    fn test_render_escapes_logins() {
        let html = WidgetRenderer::new().unwrap().render(&snapshot()).unwrap();
        assert!(html.contains("&lt;carol&gt;"));
        assert!(!html.contains("<carol>"));
    }

    #[test]
    fn test_render_empty_snapshot() {
        let html = WidgetRenderer::new()
            .unwrap()
            .render(&LeaderboardSnapshot::default())
            .unwrap();
        assert_eq!(html.matches("Nobody yet").count(), 2);
    }
}
