//! Command-line interface for xmlxref

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use xmlxref::{Document, Pattern, Required, Rule, Schema, Scope};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Command {
    /// Validate cross-references in an XML document
    Validate {
        /// XML document to validate
        filename: String,
    },
}

/// The bundled rule set: sections, figures and tables carry `@ID`;
/// `xref` elements point back at them through `@IDref`.
#[cfg(feature = "cli")]
fn builtin_schema() -> xmlxref::Result<Schema> {
    Schema::builder("document cross-references")
        .pattern(
            Pattern::new("xref targets", "/").scope(
                Scope::new(".")
                    .rule(
                        Rule::new("//xref/@IDref/text()")
                            .required(Required::Forward)
                            .assert("@IDref/text()", "//section/@ID/text()")
                            .assert("@IDref/text()", "//figure/@ID/text()")
                            .assert("@IDref/text()", "//table/@ID/text()"),
                    )
                    .rule(
                        Rule::new("//footnote/@ID/text()")
                            .required(Required::Backward)
                            .assert("@ID/text()", "//footnoteref/@IDref/text()"),
                    ),
            ),
        )
        .build()
}

#[cfg(feature = "cli")]
fn run(args: Args) -> xmlxref::Result<i32> {
    match args.command {
        Command::Validate { filename } => {
            let schema = builtin_schema()?;
            let document = Document::from_file(&filename)?;
            let diagnostics = schema.validate(&document)?;
            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic);
            }
            Ok(if diagnostics.is_empty() { 0 } else { 1 })
        }
    }
}

#[cfg(feature = "cli")]
fn main() {
    let args = Args::parse();
    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("xmlxref: {}", e);
            std::process::exit(2);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
