//! One terminal session: widget state plus line-oriented rendering.

use crate::{GalleryCommand, TaskCommand};
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use tabdeck_core::{
    current_epoch_ms, format_date, CalculatorService, GalleryService, KvTaskRepository, Navigator,
    Section, SqliteKeyValueStore, Task, TaskEvent, TaskId, TaskListService, FADE_OUT_DELAY_MS,
    REMOVAL_DELAY_MS,
};

type CliResult = Result<(), Box<dyn Error>>;
type Sink = Box<dyn FnMut(&str)>;
type Tasks<'conn> = TaskListService<KvTaskRepository<SqliteKeyValueStore<'conn>>>;

const REPL_HELP: &str = "\
commands:
  tab <calculator|tasklist|gallery>   switch section
  <keys...>                           calculator keys when on the calculator tab
  calc <keys...>                      calculator keys from any tab
  list                                show the active section
  add <text> [@YYYY-MM-DD]            add a task
  done <id> | delete <id>             complete or delete a task
  edit <id> <text> | date <id> [day]  edit text or due date
  open <index> | close                gallery viewer
  help | quit";

pub struct Session<'conn> {
    calculator: CalculatorService<Sink>,
    tasks: Tasks<'conn>,
    gallery: GalleryService,
    navigator: Navigator,
    trace: bool,
}

impl<'conn> Session<'conn> {
    /// Loads persisted tasks. With `trace`, every display update is printed.
    pub fn open(conn: &'conn Connection, trace: bool) -> Result<Self, Box<dyn Error>> {
        let sink: Sink = if trace {
            Box::new(|text: &str| println!("{text}"))
        } else {
            Box::new(|_: &str| {})
        };
        let repo = KvTaskRepository::new(SqliteKeyValueStore::new(conn));

        Ok(Self {
            calculator: CalculatorService::new(sink),
            tasks: TaskListService::load(repo)?,
            gallery: GalleryService::default(),
            navigator: Navigator::new(),
            trace,
        })
    }

    pub fn run_calc(&mut self, tokens: &[String]) -> CliResult {
        self.press_keys(tokens.iter().map(String::as_str))
    }

    pub fn run_task(&mut self, command: TaskCommand) -> CliResult {
        match command {
            TaskCommand::List => self.print_tasks(),
            TaskCommand::Add { text, date } => {
                let id = self
                    .tasks
                    .add_task(&text, date.as_deref(), current_epoch_ms())?;
                println!("added #{id}");
            }
            TaskCommand::Done { id, wait } => {
                self.complete(id)?;
                if wait {
                    self.drain_timeline()?;
                }
            }
            TaskCommand::Edit { id, text } => {
                if self.tasks.edit_task_text(id, &text)? {
                    println!("updated #{id}");
                } else {
                    println!("no changes");
                }
            }
            TaskCommand::Date { id, date } => {
                self.tasks.edit_task_date(id, date.as_deref())?;
                println!("due date updated for #{id}");
            }
            TaskCommand::Delete { id, yes } => {
                if yes || confirm("Are you sure you want to delete this task?")? {
                    self.tasks.delete_task(id)?;
                    println!("deleted #{id}");
                }
            }
        }
        Ok(())
    }

    pub fn run_gallery(&mut self, command: GalleryCommand) -> CliResult {
        match command {
            GalleryCommand::List => self.print_gallery(),
            GalleryCommand::Open { index } => {
                let view = self.gallery.open(index)?;
                println!("{}\n{}", view.caption, view.image_url);
            }
        }
        Ok(())
    }

    /// Reads commands from stdin until `quit` or end of input.
    pub fn run_repl(&mut self) -> CliResult {
        info!("event=repl_start module=cli status=ok");
        println!("{REPL_HELP}");
        self.print_section();

        let mut line = String::new();
        loop {
            print!("[{}]> ", self.navigator.active());
            io::stdout().flush()?;

            line.clear();
            if io::stdin().read_line(&mut line)? == 0 {
                break;
            }
            report_timeline(self.tasks.advance(current_epoch_ms())?);

            let words: Vec<&str> = line.split_whitespace().collect();
            match self.run_repl_line(&words) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => println!("error: {err}"),
            }
        }

        info!("event=repl_stop module=cli status=ok");
        Ok(())
    }

    /// Returns `Ok(false)` when the session should end.
    fn run_repl_line(&mut self, words: &[&str]) -> Result<bool, Box<dyn Error>> {
        let Some((&head, rest)) = words.split_first() else {
            return Ok(true);
        };

        match (head, rest) {
            ("quit" | "exit", _) => return Ok(false),
            ("help", _) => println!("{REPL_HELP}"),
            ("tab", [section]) => match self.navigator.go_to(section) {
                Some(_) => self.print_section(),
                None => println!("unknown section `{section}`"),
            },
            ("list", _) => self.print_section(),
            ("calc", keys) => self.run_calc_keys(keys)?,
            ("add", text) if !text.is_empty() => {
                let (text, date) = split_due_date(text);
                let id = self
                    .tasks
                    .add_task(&text, date.as_deref(), current_epoch_ms())?;
                println!("added #{id}");
            }
            ("done", [id]) => self.complete(id.parse::<TaskId>()?)?,
            ("delete", [id]) => {
                let id: TaskId = id.parse()?;
                if confirm("Are you sure you want to delete this task?")? {
                    self.tasks.delete_task(id)?;
                    println!("deleted #{id}");
                }
            }
            ("edit", [id, text @ ..]) => {
                let changed = self.tasks.edit_task_text(id.parse::<TaskId>()?, &text.join(" "))?;
                println!("{}", if changed { "updated" } else { "no changes" });
            }
            ("date", [id, date @ ..]) => {
                self.tasks
                    .edit_task_date(id.parse::<TaskId>()?, date.first().copied())?;
                println!("due date updated");
            }
            ("open", [index]) => {
                let view = self.gallery.open(index.parse::<usize>()?)?;
                println!("{}\n{}", view.caption, view.image_url);
            }
            ("close", _) => {
                self.gallery.close();
                println!("viewer closed");
            }
            _ if self.navigator.is_active(Section::Calculator) => self.run_calc_keys(words)?,
            _ => println!("unknown command; type `help`"),
        }
        Ok(true)
    }

    fn run_calc_keys(&mut self, keys: &[&str]) -> CliResult {
        self.press_keys(keys.iter().copied())
    }

    /// Presses every key, then prints the display unless the sink already did.
    fn press_keys<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) -> CliResult {
        for key in keys {
            self.calculator.press_token(key)?;
        }
        if !self.trace {
            println!("{}", self.calculator.display());
        }
        Ok(())
    }

    fn complete(&mut self, id: TaskId) -> CliResult {
        if self.tasks.complete_task(id, current_epoch_ms())? {
            println!("completed #{id}");
        } else {
            println!("nothing to complete for #{id}");
        }
        Ok(())
    }

    /// Blocks until every pending removal stage has fired.
    fn drain_timeline(&mut self) -> CliResult {
        while let Some(due_at) = self.tasks.timeline().next_due_at() {
            let wait_ms = due_at
                .saturating_sub(current_epoch_ms())
                .clamp(0, FADE_OUT_DELAY_MS + REMOVAL_DELAY_MS);
            thread::sleep(Duration::from_millis(wait_ms.unsigned_abs()));
            report_timeline(self.tasks.advance(current_epoch_ms())?);
        }
        Ok(())
    }

    fn print_section(&self) {
        let section = self.navigator.active();
        println!("{}", section_header(section));
        match section {
            Section::Calculator => println!("{}", self.calculator.display()),
            Section::TaskList => self.print_tasks(),
            Section::Gallery => self.print_gallery(),
        }
    }

    fn print_tasks(&self) {
        if self.tasks.tasks().is_empty() {
            println!("no tasks");
            return;
        }
        for task in self.tasks.tasks() {
            println!("{}", task_line(task, self.tasks.timeline().is_fading(task.id)));
        }
    }

    fn print_gallery(&self) {
        for (index, image) in self.gallery.images().iter().enumerate() {
            println!("{index:>2}  {}", image.title);
        }
        if let Some(view) = self.gallery.modal() {
            println!("viewing: {}", view.caption);
        }
    }
}

fn report_timeline(events: Vec<TaskEvent>) {
    for event in events {
        match event {
            TaskEvent::FadeOutStarted(id) => println!("#{id} fading out"),
            TaskEvent::Removed(id) => println!("#{id} removed"),
        }
    }
}

fn section_header(section: Section) -> String {
    format!("== {} ==", section.title())
}

fn task_line(task: &Task, fading: bool) -> String {
    let mark = match (task.completed, fading) {
        (_, true) => "~",
        (true, false) => "x",
        (false, false) => " ",
    };
    let mut line = format!("[{mark}] #{} {}", task.id, task.text);
    if let Some(date) = task.date.as_deref() {
        line.push_str(&format!("  ({})", format_date(date)));
    }
    line
}

/// Splits a trailing `@YYYY-MM-DD` word off task text.
fn split_due_date(words: &[&str]) -> (String, Option<String>) {
    match words.split_last() {
        Some((last, text)) if last.starts_with('@') && !text.is_empty() => {
            (text.join(" "), Some(last[1..].to_string()))
        }
        _ => (words.join(" "), None),
    }
}

fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
