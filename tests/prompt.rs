use optio::{option, Command, Error, Prompt, Terminal};
use std::{cell::RefCell, collections::VecDeque, error, io, rc::Rc, result};

type Result = result::Result<(), Box<dyn error::Error>>;

/// Replays scripted lines and records everything written; an exhausted script cancels.
#[derive(Clone, Default)]
struct Script {
    inputs: Rc<RefCell<VecDeque<String>>>,
    hidden: Rc<RefCell<Vec<bool>>>,
    output: Rc<RefCell<String>>,
}

impl Script {
    fn new<const N: usize>(inputs: [&str; N]) -> Self {
        let script = Self::default();
        script
            .inputs
            .borrow_mut()
            .extend(inputs.into_iter().map(str::to_owned));
        script
    }

    fn output(&self) -> String {
        self.output.borrow().clone()
    }

    fn reads(&self) -> usize {
        self.hidden.borrow().len()
    }
}

impl Terminal for Script {
    fn read(&mut self, hide: bool) -> io::Result<Option<String>> {
        self.hidden.borrow_mut().push(hide);
        Ok(self.inputs.borrow_mut().pop_front())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.borrow_mut().push_str(text);
        Ok(())
    }
}

struct Broken;

impl Terminal for Broken {
    fn read(&mut self, _: bool) -> io::Result<Option<String>> {
        Err(io::ErrorKind::BrokenPipe.into())
    }

    fn write(&mut self, _: &str) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn prompts_when_absent() -> Result {
    let script = Script::new(["boba"]);
    let mut command = Command::new("repo").terminal(script.clone());
    let username = option().prompt(Prompt::new()).bind(&mut command, "username")?;

    command.parse_with(Vec::<String>::new())?;
    assert_eq!(*username.get(), "boba");
    assert_eq!(script.output(), "Username: ");
    Ok(())
}

#[test]
fn does_not_prompt_when_provided() -> Result {
    let script = Script::new(["boba"]);
    let mut command = Command::new("repo").terminal(script.clone());
    let username = option().prompt(Prompt::new()).bind(&mut command, "username")?;

    command.parse_with(["--username", "fett"])?;
    assert_eq!(*username.get(), "fett");
    assert_eq!(script.reads(), 0);
    assert_eq!(script.output(), "");
    Ok(())
}

#[test]
fn cancelled_prompt_aborts() -> Result {
    let script = Script::new([]);
    let mut command = Command::new("repo").terminal(script.clone());
    let username = option().prompt(Prompt::new()).bind(&mut command, "username")?;

    assert_eq!(command.parse_with(Vec::<String>::new()), Err(Error::Aborted));
    assert!(!username.is_set());
    Ok(())
}

#[test]
fn asks_again_after_conversion_failure() -> Result {
    let script = Script::new(["many", "300", "7"]);
    let mut command = Command::new("repo").terminal(script.clone());
    let retries = option()
        .parse::<u8>()
        .prompt(Prompt::new().text("Retries"))
        .bind(&mut command, "retries")?;

    command.parse_with(Vec::<String>::new())?;
    assert_eq!(*retries.get(), 7);
    assert_eq!(script.reads(), 3);
    let output = script.output();
    assert!(output.starts_with("Retries: Error: Failed to parse value 'many' as 'U8' for option '--retries'"));
    assert!(output.contains("Error: Failed to parse value '300'"));
    assert!(output.ends_with("Retries: "));
    Ok(())
}

#[test]
fn empty_input_uses_default() -> Result {
    let script = Script::new(["", "ignored"]);
    let mut command = Command::new("repo").terminal(script.clone());
    let username = option()
        .prompt(Prompt::new().default("guest"))
        .bind(&mut command, "username")?;

    command.parse_with(Vec::<String>::new())?;
    assert_eq!(*username.get(), "guest");
    assert_eq!(script.output(), "Username [guest]: ");
    Ok(())
}

#[test]
fn empty_input_without_default_asks_again() -> Result {
    let script = Script::new(["", "", "boba"]);
    let mut command = Command::new("repo").terminal(script.clone());
    let username = option()
        .prompt(Prompt::new().suffix("> "))
        .bind(&mut command, "user_name")?;

    command.parse_with(Vec::<String>::new())?;
    assert_eq!(*username.get(), "boba");
    assert_eq!(script.output(), "User name> User name> User name> ");
    Ok(())
}

#[test]
fn hidden_input_requires_confirmation() -> Result {
    let script = Script::new(["secret", "secrte", "secret", "secret"]);
    let mut command = Command::new("repo").terminal(script.clone());
    let password = option()
        .prompt(Prompt::new().hide().confirm())
        .bind(&mut command, "password")?;

    command.parse_with(Vec::<String>::new())?;
    assert_eq!(*password.get(), "secret");
    assert_eq!(*script.hidden.borrow(), [true; 4]);
    assert_eq!(
        script.output(),
        "Password: Repeat for confirmation: Error: the two entered values do not match\nPassword: Repeat for confirmation: "
    );
    Ok(())
}

#[test]
fn prompted_value_is_validated() -> Result {
    let script = Script::new(["11"]);
    let mut command = Command::new("repo").terminal(script.clone());
    let _retries = option()
        .parse::<u8>()
        .prompt(Prompt::new())
        .validate(|retries| if *retries <= 10 { Ok(()) } else { Err("at most 10") })
        .bind(&mut command, "retries")?;

    assert_eq!(
        command.parse_with(Vec::<String>::new()),
        Err(Error::InvalidOptionValue("at most 10".into(), "--retries".into()))
    );
    Ok(())
}

#[test]
fn prompts_in_registration_order() -> Result {
    let script = Script::new(["boba", "fett"]);
    let mut command = Command::new("repo").terminal(script.clone());
    let first = option().prompt(Prompt::new()).bind(&mut command, "first")?;
    let rev = option().default("HEAD".to_owned()).bind(&mut command, "rev")?;
    let second = option().prompt(Prompt::new()).bind(&mut command, "second")?;

    command.parse_with(Vec::<String>::new())?;
    assert_eq!(*first.get(), "boba");
    assert_eq!(*rev.get(), "HEAD");
    assert_eq!(*second.get(), "fett");
    assert_eq!(script.output(), "First: Second: ");
    Ok(())
}

#[test]
fn terminal_failure_is_reported() -> Result {
    let mut command = Command::new("repo").terminal(Broken);
    let _username = option().prompt(Prompt::new()).bind(&mut command, "username")?;

    assert_eq!(
        command.parse_with(Vec::<String>::new()),
        Err(Error::Io(io::ErrorKind::BrokenPipe))
    );
    Ok(())
}

#[test]
fn prompt_line_shows_default() {
    assert_eq!(Prompt::new().line("Rev"), "Rev: ");
    assert_eq!(Prompt::new().default("HEAD").line("Rev"), "Rev [HEAD]: ");
    assert_eq!(
        Prompt::new().default("HEAD").show_default(false).line("Rev"),
        "Rev: "
    );
}
