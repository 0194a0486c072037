//! Status dashboard: a per-request view of every configured service.
//!
//! The view model is derived fresh on each request from the immutable
//! mount outcome plus the request's host header; rendering never touches
//! shared gateway state.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum_extra::extract::Host;

use crate::mount::{MountedService, ServiceStatus};

const DASHBOARD_TEMPLATE: &str = include_str!("../assets/dashboard.html");

/// One dashboard table row.
struct DashboardRow {
    name: &'static str,
    label: &'static str,
    indicator: &'static str,
    url: Option<String>,
}

fn view_model(services: &[MountedService], host: &str) -> Vec<DashboardRow> {
    services
        .iter()
        .map(|service| DashboardRow {
            name: service.name(),
            label: service.status().label(),
            indicator: match service.status() {
                ServiceStatus::Live => "green",
                ServiceStatus::Degraded | ServiceStatus::Disabled => "red",
            },
            url: service.display_url(host),
        })
        .collect()
}

fn render_rows(rows: &[DashboardRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let url_cell = match &row.url {
            Some(url) => format!(r#"<a href="{url}">{url}</a>"#),
            None => String::new(),
        };
        out.push_str(&format!(
            "<tr><td>{name}</td>\
             <td><span class=\"status {indicator}\">{label}</span></td>\
             <td>{url_cell}</td></tr>\n",
            name = row.name,
            indicator = row.indicator,
            label = row.label,
        ));
    }
    out
}

pub(crate) async fn render(
    State(services): State<Arc<Vec<MountedService>>>,
    Host(host): Host,
) -> Html<String> {
    let rows = view_model(&services, &host);
    Html(DASHBOARD_TEMPLATE.replace("{{rows}}", &render_rows(&rows)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(name: &'static str, prefix: &'static str, status: ServiceStatus) -> MountedService {
        MountedService::for_tests(name, prefix, status)
    }

    #[test]
    fn live_services_get_a_url_and_green_light() {
        let services = [service("api", "api", ServiceStatus::Live)];
        let rows = view_model(&services, "gateway.test:8261");
        assert_eq!(rows[0].indicator, "green");
        assert_eq!(rows[0].label, "reachable");
        assert_eq!(
            rows[0].url.as_deref(),
            Some("http://gateway.test:8261/api")
        );
    }

    #[test]
    fn degraded_and_disabled_are_distinct_but_both_red() {
        let services = [
            service("api", "api", ServiceStatus::Degraded),
            service("docs", "docs", ServiceStatus::Disabled),
        ];
        let rows = view_model(&services, "gateway.test");
        assert_eq!(rows[0].label, "degraded");
        assert_eq!(rows[1].label, "disabled");
        assert!(rows.iter().all(|r| r.indicator == "red" && r.url.is_none()));
    }

    #[test]
    fn rendered_rows_link_only_live_services() {
        let services = [
            service("api", "api", ServiceStatus::Live),
            service("terminal", "terminal", ServiceStatus::Disabled),
        ];
        let html = render_rows(&view_model(&services, "localhost"));
        assert!(html.contains(r#"<a href="http://localhost/api">"#));
        assert!(!html.contains("http://localhost/terminal"));
    }
}
