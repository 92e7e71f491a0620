use colored::*;
use mcstat_common::batch::BatchResult;
use mcstat_common::status::ProbeResult;

pub const TOTAL_WIDTH: usize = 64;
const KEY_WIDTH: usize = 7;

mod colors {
    use colored::Color;

    pub const PRIMARY: Color = Color::BrightGreen;
    pub const ACCENT: Color = Color::BrightCyan;
    pub const SEPARATOR: Color = Color::BrightBlack;
    pub const TEXT_DEFAULT: Color = Color::White;
    pub const FAILURE: Color = Color::Red;
}

pub fn print(msg: &str) {
    println!("{msg}");
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: String = format!(
        "{}{}{}",
        "─".repeat(left).color(colors::SEPARATOR),
        formatted.to_uppercase().color(colors::PRIMARY),
        "─".repeat(right).color(colors::SEPARATOR)
    );

    print(&line);
}

pub fn tree_head(idx: usize, name: &str) {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    let output: String = format!(
        "{} {}",
        idx_str.color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    );
    print(&output);
}

pub fn as_tree_one_level(key_value_pair: Vec<(String, ColoredString)>) {
    for (i, (key, value)) in key_value_pair.iter().enumerate() {
        let last: bool = i + 1 == key_value_pair.len();
        let branch: ColoredString = if !last {
            "├─".color(colors::SEPARATOR)
        } else {
            "└─".color(colors::SEPARATOR)
        };
        let output: String = format!(
            " {} {}{}{} {}",
            branch,
            key.color(colors::TEXT_DEFAULT),
            ".".repeat(KEY_WIDTH.saturating_sub(key.len())).color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        );
        print(&output);
    }
}

pub fn to_key_value_pair(result: &ProbeResult) -> Vec<(String, ColoredString)> {
    match result {
        ProbeResult::Status(status) => {
            let players: String = format!("{}/{}", status.online_players, status.max_players);
            let motd: String = status.description.split_whitespace().collect::<Vec<_>>().join(" ");
            vec![
                (String::from("Players"), players.color(colors::ACCENT)),
                (String::from("MOTD"), motd.color(colors::TEXT_DEFAULT)),
            ]
        }
        ProbeResult::Failure(failure) => {
            vec![(String::from("Error"), failure.reason.as_str().color(colors::FAILURE))]
        }
    }
}

/// Renders a finished batch as one small tree per distinct address.
pub fn batch(batch: &BatchResult) {
    header(&format!("{} server(s)", batch.len()));

    for (idx, (raw, result)) in batch.iter().enumerate() {
        tree_head(idx, &format!("{raw:?}"));
        as_tree_one_level(to_key_value_pair(result));
    }

    let online: usize = batch.iter().filter(|(_, result)| result.is_status()).count();
    let failed: usize = batch.len() - online;
    print(&format!(
        "{} online, {} failed",
        online.to_string().color(colors::PRIMARY).bold(),
        failed.to_string().color(colors::FAILURE).bold()
    ));
    end_of_program();
}

pub fn end_of_program() {
    print(&format!(
        "{}",
        "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR)
    ));
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
