use cotton_core::{CropField, FertilizerField, FormField, Msg};

use super::super::app::Input;
use super::super::files;

pub const HELP: &[&str] = &[
    "upload <path>...           classify an image (exactly one file is accepted)",
    "reset                      clear the image and any result",
    "retry                      resubmit the current image after a failure",
    "crop <field> <value>       edit a crop form field",
    "crop submit                request a crop recommendation",
    "fertilizer <field> <value> edit a fertilizer form field",
    "fertilizer submit          request a fertilizer recommendation",
    "show                       print every panel",
    "help                       print this list",
    "quit                       leave the shell",
];

/// Turns one shell line into an input for the session loop.
pub fn parse_line(line: &str) -> Option<Input> {
    let mut words = line.split_whitespace();
    let command = words.next()?;
    let rest: Vec<&str> = words.collect();

    let input = match command.to_ascii_lowercase().as_str() {
        "upload" => upload(&rest),
        "reset" => Input::Msg(Msg::ResetClicked),
        "retry" => Input::Msg(Msg::ResubmitClicked),
        "crop" => form_command::<CropField>(
            "crop",
            &rest,
            Msg::CropSubmitted,
            |field, value| Msg::CropFieldChanged { field, value },
        ),
        "fertilizer" => form_command::<FertilizerField>(
            "fertilizer",
            &rest,
            Msg::FertilizerSubmitted,
            |field, value| Msg::FertilizerFieldChanged { field, value },
        ),
        "show" => Input::Show,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => Input::Invalid(format!("Unknown command '{other}'; type help")),
    };
    Some(input)
}

fn upload(paths: &[&str]) -> Input {
    match files::load_selections(paths) {
        Ok(selections) => Input::Msg(Msg::FilesSelected(selections)),
        Err(err) => Input::Invalid(format!("Could not read file: {err}")),
    }
}

/// `<form> submit` or `<form> <field> <value...>`; an empty value clears the field.
fn form_command<F: FormField>(
    form: &str,
    args: &[&str],
    submit: Msg,
    change: impl FnOnce(F, String) -> Msg,
) -> Input {
    match args {
        ["submit"] => Input::Msg(submit),
        [key, value @ ..] => match F::from_key(key) {
            Some(field) => Input::Msg(change(field, value.join(" "))),
            None => {
                let keys: Vec<&str> = F::ALL.iter().map(|field| field.key()).collect();
                Input::Invalid(format!(
                    "Unknown {form} field '{key}'; expected one of {}",
                    keys.join(", ")
                ))
            }
        },
        [] => Input::Invalid(format!("Usage: {form} <field> <value> | {form} submit")),
    }
}
