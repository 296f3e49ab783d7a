//! Markdown and JSON report generation.
//!
//! This module renders a planning run as a Markdown document with one
//! table per pipeline stage, or as pretty-printed JSON.

use super::{PlanReport, ReportMetadata};
use crate::models::{
    AnalysisOptions, FdmAnalysisResult, PortExpansionCoolingSummary, PortExpansionResult,
    TdmUxgAnalysisResult,
};
use anyhow::Result;
use std::collections::BTreeMap;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &PlanReport) -> String {
    let mut output = String::new();

    output.push_str("# LabPlan Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_inputs_section(&report.options));
    output.push_str(&generate_fdm_section(&report.analysis.fdm));
    output.push_str(&generate_tdm_uxg_section(&report.analysis.tdm_uxg));
    output.push_str(&generate_cooling_section(&report.analysis.ports));

    if let Some(ref results) = report.distribution {
        output.push_str(&generate_distribution_section(results));
    }

    output.push_str("---\n\n*Report generated by LabPlan*\n");

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Machine:** {}\n", metadata.machine_name));
    section.push_str(&format!("- **Location:** {}\n", metadata.location));
    section.push_str(&format!(
        "- **Config Version:** {}\n",
        metadata.config_version
    ));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.3}s\n\n",
        metadata.duration_seconds
    ));

    section
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn generate_inputs_section(options: &AnalysisOptions) -> String {
    let mut section = String::new();

    section.push_str("## Inputs\n\n");
    section.push_str("| Parameter | Value |\n");
    section.push_str("|:---|---:|\n");
    section.push_str(&format!(
        "| Section bandwidth | {} MHz |\n",
        options.section_bandwidth_mhz
    ));
    section.push_str(&format!("| FDM present | {} |\n", yes_no(options.fdm_present)));
    section.push_str(&format!(
        "| Virtual channels | {} |\n",
        options.number_of_virtual_channels
    ));
    section.push_str(&format!("| Receiver ports | {} |\n", options.rec_port_count));
    section.push_str(&format!(
        "| Max frequency played | {} GHz |\n",
        options.max_freq_played_ghz
    ));
    section.push_str(&format!(
        "| TDM / UXG enabled | {} / {} |\n",
        yes_no(options.tdm_enabled),
        yes_no(options.uxg_enabled)
    ));
    section.push_str(&format!(
        "| Lab size | {} ft x {} ft |\n\n",
        options.lab_width_ft, options.lab_length_ft
    ));

    section
}

fn generate_fdm_section(fdm: &FdmAnalysisResult) -> String {
    let mut section = String::new();

    section.push_str("## FDM Bands\n\n");

    if fdm.bands.is_empty() {
        section.push_str("No FDM bands were derived.\n\n");
    } else {
        section.push_str(
            "| Band | Min (MHz) | Center (MHz) | Max (MHz) | VC Avail | VC Used | Assigned | Played | Dropped | Drop % |\n",
        );
        section.push_str("|:---:|---:|---:|---:|---:|---:|---:|---:|---:|---:|\n");

        for band in &fdm.bands {
            section.push_str(&format!(
                "| {} | {:.1} | {:.1} | {:.1} | {} | {} | {} | {} | {} | {:.2} |\n",
                band.band_number,
                band.min_mhz,
                band.center_mhz,
                band.max_mhz,
                band.vc_available,
                band.max_vc_used,
                band.pulses_assigned,
                band.pulses_played,
                band.pulses_dropped,
                band.pulse_drop_percent
            ));
        }
        section.push('\n');
    }

    section.push_str(&format!(
        "**Pulses to TDM/UXG:** {}\n\n",
        fdm.pulses_to_tdm_uxg
    ));

    section
}

fn generate_tdm_uxg_section(tdm_uxg: &TdmUxgAnalysisResult) -> String {
    let mut section = String::new();

    section.push_str("## TDM/UXG Scenarios\n\n");

    if tdm_uxg.channels.is_empty() {
        section.push_str("No channel scenarios.\n\n");
        return section;
    }

    let channels: Vec<String> = tdm_uxg.channels.iter().map(|c| c.to_string()).collect();
    section.push_str(&format!("Channel counts: {}\n\n", channels.join(", ")));

    section
}

fn generate_cooling_section(ports: &PortExpansionResult) -> String {
    let mut section = String::new();

    section.push_str("## Hardware Cooling\n\n");

    if ports.rows.is_empty() {
        section.push_str("No scenarios to evaluate.\n\n");
    } else {
        section.push_str(
            "| Scenario | VXG Units | VXG (tons) | V-UXG | V-UXG (tons) | A-UXG | A-UXG (tons) | Total HW (tons) |\n",
        );
        section.push_str("|:---:|---:|---:|---:|---:|---:|---:|---:|\n");

        for (i, row) in ports.rows.iter().enumerate() {
            section.push_str(&format!(
                "| {} | {} | {:.2} | {} | {:.2} | {} | {:.2} | {:.2} |\n",
                i + 1,
                row.num_of_vxg_units,
                row.vxg_cooling_tons,
                row.num_of_vuxg,
                row.vuxg_cooling_tons,
                row.num_of_auxg,
                row.auxg_cooling_tons,
                row.total_hw_cooling_tons
            ));
        }
        section.push('\n');
    }

    section.push_str(&generate_cooling_summary(&ports.summary));

    section
}

fn generate_cooling_summary(summary: &PortExpansionCoolingSummary) -> String {
    let mut section = String::new();

    section.push_str("### Cooling Summary\n\n");
    section.push_str(&format!(
        "- **Hardware cooling:** {:.2} tons\n",
        summary.total_hw_cooling_tons
    ));
    section.push_str(&format!(
        "- **Lab size:** {:.2} sq ft\n",
        summary.lab_size_sqft
    ));
    section.push_str(&format!(
        "- **Lab cooling:** {:.2} tons\n",
        summary.lab_cooling_req_tons
    ));
    section.push_str(&format!(
        "- **Total cooling required:** {:.2} tons\n\n",
        summary.total_overall_cooling_req_tons
    ));

    section
}

fn generate_distribution_section(results: &BTreeMap<String, bool>) -> String {
    let mut section = String::new();

    section.push_str("## Distribution\n\n");

    if results.is_empty() {
        section.push_str("No agents matched.\n\n");
        return section;
    }

    section.push_str("| Agent | Result |\n");
    section.push_str("|:---|:---:|\n");
    for (agent, ok) in results {
        let status = if *ok { "✅ delivered" } else { "❌ failed" };
        section.push_str(&format!("| `{}` | {} |\n", agent, status));
    }
    section.push('\n');

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &PlanReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
