//! Rendered HTML for the browser-facing pages. Pure functions of the
//! controller state; no handler logic lives here.

use webtherm_common::{ControllerStatus, SaveReport};

const STYLE: &str = "html { font-family: Helvetica; display: inline-block; margin: 0px auto; text-align: center; }\n\
    .button { background-color: #195B6A; border: none; color: white; padding: 16px 40px; }\n\
    body { margin-top: 50px; } h1 { color: #444444; margin: 50px auto 30px; }\n\
    p { font-size: 24px; color: #444444; margin-bottom: 10px; }";

fn shell(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html>\n\
        <head><meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0, user-scalable=no\">\n\
        <title>{title}</title>\n\
        <style>{STYLE}</style></head>\n\
        <body><div id=\"webpage\">\n{body}\n</div></body></html>\n"
    )
}

fn action_button(action: &str, label: &str) -> String {
    format!(
        "<p><form method=\"post\" action=\"{action}\">\
        <button class=\"button\">{label}</button></form></p>"
    )
}

pub fn home(status: &ControllerStatus) -> String {
    let device_line = if status.device_on {
        "<p>Device is on.</p>"
    } else {
        "<p>Device is off.</p>"
    };

    // Each toggle shows the current state and posts the opposite one.
    let power_button = if status.power_on {
        action_button("/api/power?value=off", "On")
    } else {
        action_button("/api/power?value=on", "Off")
    };
    let mode_button = if status.mode == "HEAT" {
        action_button("/api/mode?value=cool", "Heat")
    } else {
        action_button("/api/mode?value=heat", "Cool")
    };

    let body = format!(
        "<h1>Room Temperature</h1>\n<p>{current_temp:.2} F</p>\n\
        <h1>Setpoint</h1>\n\
        {up}\n<p>{setpoint:.1} F</p>\n{down}\n\
        {device_line}\n\
        <h1>Power</h1>\n{power_button}\n\
        <h1>Mode</h1>\n{mode_button}\n\
        <p><a href=\"/settings\"><button class=\"button\">Settings</button></a></p>",
        current_temp = status.current_temp,
        setpoint = status.setpoint,
        up = action_button("/api/setpoint/up", "+"),
        down = action_button("/api/setpoint/down", "-"),
    );

    shell("Web Enabled Thermostat", &body)
}

pub fn settings() -> String {
    let body = format!(
        "<h1>Save Settings</h1>\n{save}\n{erase}\n\
        <p><a href=\"/\"><button class=\"button\">Back</button></a></p>",
        save = action_button("/api/settings/save", "Save"),
        erase = action_button("/api/settings/erase", "Erase"),
    );
    shell("Settings", &body)
}

pub fn save_report(report: &SaveReport) -> String {
    fn line(written: bool, what: &str) -> String {
        if written {
            format!("<p>Updated {what} in storage.</p>")
        } else {
            format!("<p>Did not update {what}, same value in storage.</p>")
        }
    }

    let body = format!(
        "<p><a href=\"/\"><button class=\"button\">Back</button></a></p>\n{}\n{}\n{}",
        line(report.setpoint_written, "setpoint"),
        line(report.power_written, "power setting"),
        line(report.mode_written, "mode setting"),
    );
    shell("Settings Saved", &body)
}
