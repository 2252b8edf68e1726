//! Prometheus text exposition format.
//!
//! Renders the current registry contents into the Prometheus text exposition
//! format for scraping by a Prometheus server or compatible agent.

use crate::registry::MetricRegistry;

/// Render every registered gauge into Prometheus text format.
///
/// Families appear in registration order with `# HELP` / `# TYPE` headers,
/// followed by one sample line per cell.
pub fn render_prometheus(registry: &MetricRegistry) -> String {
    let mut out = String::new();

    for family in registry.families() {
        out.push_str(&format!("# HELP {} {}\n", family.name(), family.help()));
        out.push_str(&format!("# TYPE {} gauge\n", family.name()));
        for sample in family.samples() {
            match &sample.label {
                Some((key, value)) => {
                    out.push_str(&format!(
                        "{}{{{}=\"{}\"}} {}\n",
                        sample.name, key, value, sample.value
                    ));
                }
                None => {
                    out.push_str(&format!("{} {}\n", sample.name, sample.value));
                }
            }
        }
    }

    out
}
