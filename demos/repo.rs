use optio::{exit, option, Command, Error, Prompt};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    exit(run());
}

fn run() -> Result<(), Error> {
    let mut command = Command::new("repo");
    let repo_home = option()
        .help("Location of the repository metadata.")
        .default(".repo".to_owned())
        .bind(&mut command, "repo_home")?;
    let config = option()
        .help("Overrides a configuration key.")
        .metavar("KEY VALUE")
        .paired()
        .multiple()
        .bind(&mut command, "config")?;
    let rev = option()
        .names(["--rev", "-r"])
        .help("Revision to check out.")
        .default("HEAD".to_owned())
        .bind(&mut command, "rev")?;
    let username = option()
        .help("Name recorded in commits.")
        .prompt(Prompt::new())
        .bind(&mut command, "username")?;
    let retries = option()
        .help("Number of network retries.")
        .parse::<u8>()
        .default(3)
        .validate(|retries| {
            if *retries <= 10 {
                Ok(())
            } else {
                Err("at most 10 retries are allowed")
            }
        })
        .bind(&mut command, "retries")?;

    command.parse()?;

    println!("Repository home: {}", repo_home.get());
    println!("Revision: {}", rev.get());
    println!("User: {}", username.get());
    println!("Retries: {}", retries.get());
    for (key, value) in config.get().iter() {
        println!("Config: {key} = {value}");
    }
    Ok(())
}
