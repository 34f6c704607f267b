//! Prometheus text exposition format.
//!
//! Renders scrape samples into the text format (version 0.0.4) for
//! scraping by a Prometheus server or compatible agent.

use crate::collector::Sample;

/// Content type served alongside [`render_samples`] output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render samples into Prometheus text format.
///
/// Each sample gets its own `# HELP` and `# TYPE` header. No samples
/// renders an empty document.
pub fn render_samples(samples: &[Sample<'_>]) -> String {
    let mut out = String::new();

    for s in samples {
        let name = s.definition.full_name();
        out.push_str(&format!("# HELP {name} {}\n", escape_help(s.definition.help)));
        out.push_str(&format!("# TYPE {name} {}\n", s.definition.kind.as_str()));
        out.push_str(&format!("{name} {}\n", format_value(s.value)));
    }

    out
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{value}")
    }
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}
