// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::sync::Arc;

use modalist::config::DialogConfig;
use modalist::dialog::{
    ChoiceOption, Command, CommandPalette, Dialog, DialogStack, FilePicker, FormDialog, FormField,
    ModelChoice, ModelPicker, ModelSource, MultiChoice, ThemeChoice, ThemePicker,
    WorkingDirPicker,
};
use modalist::event::{Event, Key, KeyInput};
use modalist::message::{DialogResult, Signal};
use modalist::store::MemoryStore;
use modalist::validation::{PatternCache, StringRules};

fn config() -> DialogConfig {
    DialogConfig::default()
}

fn theme_picker() -> Box<dyn Dialog> {
    let themes = vec![
        ThemeChoice::builtin("default", "Default").default_theme(),
        ThemeChoice::builtin("dracula", "Dracula").current(),
        ThemeChoice::builtin("nord", "Nord"),
    ];
    Box::new(ThemePicker::new(themes, "dracula", &config()))
}

fn palette() -> Box<dyn Dialog> {
    let commands = vec![
        Command::new("new", "New session", "Session"),
        Command::new("theme", "Change theme", "Settings"),
    ];
    Box::new(CommandPalette::new(commands, &config()))
}

fn send(stack: &mut DialogStack, event: Event) -> Vec<Signal> {
    let signals = stack.handle_event(&event).expect("stack is not empty");
    stack.apply(signals)
}

fn type_text(stack: &mut DialogStack, text: &str) {
    for ch in text.chars() {
        send(stack, Event::key(KeyInput::char(ch)));
    }
}

fn results(signals: Vec<Signal>) -> Vec<DialogResult> {
    signals
        .into_iter()
        .filter_map(|signal| match signal {
            Signal::Result(result) => Some(result),
            _ => None,
        })
        .collect()
}

#[test]
fn second_dialog_takes_input_and_closing_reveals_the_first_untouched() {
    let mut stack = DialogStack::new(100, 40);
    assert!(stack.open(theme_picker()).is_empty());
    assert!(stack.open(palette()).is_empty());
    assert_eq!(stack.depth(), 2);

    send(&mut stack, Event::Resize { width: 120, height: 50 });
    assert_eq!(stack.top().map(|d| d.screen_size()), Some((120, 50)));
    let underneath = stack.layers()[0].clone();

    type_text(&mut stack, "the");
    let top = stack.layers()[1].block.text();
    assert!(top.contains("the"));
    assert!(top.contains("Change theme"));
    assert!(!top.contains("New session"));
    assert_eq!(stack.layers()[0], underneath);

    assert!(send(&mut stack, Event::key(Key::Esc)).is_empty());
    assert_eq!(stack.depth(), 1);
    assert_eq!(stack.top().map(|d| d.screen_size()), Some((120, 50)));
    assert_eq!(stack.layers()[0], underneath);
}

#[test]
fn confirming_the_top_dialog_leaves_the_rest_open() {
    let mut stack = DialogStack::new(100, 40);
    stack.open(theme_picker());
    stack.open(palette());

    send(&mut stack, Event::key(Key::Down));
    let out = send(&mut stack, Event::key(Key::Enter));
    assert_eq!(results(out), vec![DialogResult::CommandExecute { id: "theme".into() }]);
    assert_eq!(stack.depth(), 1);

    let out = send(&mut stack, Event::key(Key::Down));
    assert_eq!(results(out), vec![DialogResult::ThemePreview { reference: "default".into() }]);
    let out = send(&mut stack, Event::key(Key::Esc));
    assert_eq!(
        results(out),
        vec![DialogResult::ThemeCancelPreview { original: "dracula".into() }]
    );
    assert!(stack.is_empty());
    assert!(stack.handle_event(&Event::key(Key::Enter)).is_none());
}

#[test]
fn open_signal_pushes_and_close_all_clears() {
    let mut stack = DialogStack::new(80, 24);
    let rest = stack.apply([Signal::OpenDialog(theme_picker()), Signal::OpenDialog(palette())]);
    assert!(rest.is_empty());
    assert_eq!(stack.depth(), 2);
    assert_eq!(stack.top().map(|d| d.screen_size()), Some((80, 24)));

    let rest = stack.apply([Signal::CloseAllDialogs, Signal::Notify("done".into())]);
    assert!(stack.is_empty());
    assert!(matches!(rest.as_slice(), [Signal::Notify(text)] if text == "done"));
}

#[test]
fn picking_the_default_model_resets_to_default() {
    let models = vec![
        ModelChoice::new("Sonnet", "anthropic", "claude-sonnet", ModelSource::Config).current(),
        ModelChoice::new("GPT", "openai", "gpt-5", ModelSource::Config).default_model(),
        ModelChoice::new("Gemini", "google", "gemini-pro", ModelSource::Catalog),
    ];
    let mut stack = DialogStack::new(100, 40);
    stack.open(Box::new(ModelPicker::new(models, &config())));

    send(&mut stack, Event::key(Key::Down));
    let out = send(&mut stack, Event::key(Key::Enter));
    assert_eq!(results(out), vec![DialogResult::ModelChange { reference: String::new() }]);
    assert!(stack.is_empty());
}

#[test]
fn invalid_model_spec_keeps_the_dialog_open() {
    let mut stack = DialogStack::new(100, 40);
    stack.open(Box::new(ModelPicker::new(Vec::new(), &config())));
    type_text(&mut stack, "acme/x");
    assert!(send(&mut stack, Event::key(Key::Enter)).is_empty());
    assert_eq!(stack.depth(), 1);
    assert!(stack.layers()[0].block.text().contains("⚠ unknown provider 'acme'"));
}

#[test]
fn file_picker_attaches_a_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    fs::write(tmp.path().join("notes.txt"), "hello").expect("write");
    let mut stack = DialogStack::new(100, 40);
    stack.open(Box::new(FilePicker::new(tmp.path(), None, &config())));

    send(&mut stack, Event::key(Key::End));
    let out = send(&mut stack, Event::key(Key::Enter));
    assert_eq!(results(out), vec![DialogResult::InsertFileRef { path: tmp.path().join("notes.txt") }]);
}

#[test]
fn working_dir_picker_pins_and_spawns() {
    let tmp = tempfile::tempdir().expect("tempdir");
    fs::create_dir(tmp.path().join("api")).expect("mkdir");
    let store = Arc::new(MemoryStore::default());
    let mut stack = DialogStack::new(100, 40);
    stack.open(Box::new(WorkingDirPicker::new(store.clone(), tmp.path().to_owned(), &config())));

    send(&mut stack, Event::key(Key::Down));
    send(&mut stack, Event::key(Key::Down));
    send(&mut stack, Event::key(KeyInput::ctrl('p')));
    assert_eq!(store.snapshot().favorites, vec![tmp.path().join("api")]);

    send(&mut stack, Event::key(Key::Home));
    let out = send(&mut stack, Event::key(Key::Enter));
    assert_eq!(results(out), vec![DialogResult::SpawnSession { dir: tmp.path().to_owned() }]);
}

#[test]
fn multi_choice_digit_then_enter() {
    let options = vec![ChoiceOption::new("a", "Alpha"), ChoiceOption::new("b", "Beta")];
    let mut stack = DialogStack::new(100, 40);
    stack.open(Box::new(MultiChoice::new("Pick", options, false, &config())));

    send(&mut stack, Event::key(KeyInput::char('2')));
    let out = send(&mut stack, Event::key(Key::Enter));
    assert_eq!(results(out), vec![DialogResult::Choice { id: "b".into() }]);
    assert!(stack.is_empty());
}

#[test]
fn form_over_a_picker_blocks_submit_until_valid() {
    let cache = Arc::new(PatternCache::new());
    let fields = vec![FormField::new(
        "due",
        "Due date",
        StringRules { required: true, format: Some("date".into()), ..StringRules::default() },
    )];
    let mut stack = DialogStack::new(100, 40);
    stack.open(theme_picker());
    stack.open(Box::new(FormDialog::new("Schedule", "When?", fields, Arc::clone(&cache))));

    type_text(&mut stack, "2024-13-01");
    assert!(send(&mut stack, Event::key(Key::Enter)).is_empty());
    assert_eq!(stack.depth(), 2);
    assert!(stack.layers()[1].block.text().contains("⚠ Must be a valid date (YYYY-MM-DD)"));

    for _ in 0..5 {
        send(&mut stack, Event::key(Key::Backspace));
    }
    type_text(&mut stack, "12-01");
    let out = send(&mut stack, Event::key(Key::Enter));
    assert_eq!(
        results(out),
        vec![DialogResult::FormSubmit { values: vec![("due".into(), "2024-12-01".into())] }]
    );
    assert_eq!(stack.depth(), 1);
}

#[test]
fn multi_choice_free_text_answer() {
    let options = vec![ChoiceOption::new("a", "Alpha")];
    let mut stack = DialogStack::new(100, 40);
    stack.open(Box::new(MultiChoice::new("Pick", options, true, &config()).with_custom_input("Other")));

    type_text(&mut stack, "gamma");
    let out = send(&mut stack, Event::key(Key::Enter));
    assert_eq!(results(out), vec![DialogResult::ChoiceCustom { text: "gamma".into() }]);
    assert!(stack.is_empty());
}
