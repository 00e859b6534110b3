use boltwise::cli::{Cli, Commands};
use clap::Parser;
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for readable diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => boltwise::cli::commands::init::run(args),
        Commands::Check(args) => boltwise::cli::commands::check::run(args, &global),
        Commands::Batch(args) => boltwise::cli::commands::batch::run(args, &global),
        Commands::Subs(args) => boltwise::cli::commands::subs::run(args, &global),
        Commands::Project(args) => boltwise::cli::commands::project::run(args, &global),
        Commands::Thread(cmd) => boltwise::cli::commands::thread::run(cmd, &global),
        Commands::Part(cmd) => boltwise::cli::commands::part::run(cmd, &global),
        Commands::Material(cmd) => boltwise::cli::commands::material::run(cmd, &global),
        Commands::Completions(args) => boltwise::cli::commands::completions::run(args),
    }
}
