use line_basic::{Executor, ProgramTable};
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::process;

/// Exit status for a program that failed to load or run
const EXIT_PROGRAM_ERROR: i32 = 1;
/// Exit status for bad arguments or an unreadable file
const EXIT_USAGE: i32 = 2;

/// Command line options
#[derive(Debug, Default)]
struct Options {
    list: bool,
    path: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_help();
            return;
        }
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Usage: basic [--list] [FILE]");
            process::exit(EXIT_USAGE);
        }
    };

    let source = match read_source(options.path.as_deref()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Cannot read program: {}", e);
            process::exit(EXIT_USAGE);
        }
    };

    let program = match ProgramTable::from_source(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_PROGRAM_ERROR);
        }
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if options.list {
        if let Err(e) = out.write_all(program.listing().as_bytes()) {
            eprintln!("Error: {}", e);
            process::exit(EXIT_PROGRAM_ERROR);
        }
    }

    let mut executor = Executor::new(&program, out);
    let result = executor.run();
    // Keep whatever was printed before a failure
    if let Err(e) = executor.into_output().flush() {
        eprintln!("Error: {}", e);
        process::exit(EXIT_PROGRAM_ERROR);
    }

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(EXIT_PROGRAM_ERROR);
    }
}

/// Parse arguments; `Ok(None)` means help was requested
fn parse_args<I: Iterator<Item = String>>(args: I) -> Result<Option<Options>, String> {
    let mut options = Options::default();

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "-l" | "--list" => options.list = true,
            flag if flag.starts_with('-') && flag != "-" => {
                return Err(format!("Unknown option: {}", flag));
            }
            _ if options.path.is_some() => return Err("Too many arguments".to_string()),
            path => options.path = Some(path.to_string()),
        }
    }

    Ok(Some(options))
}

/// Read the whole program from a file, or stdin for no path or `-`
fn read_source(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) if path != "-" => fs::read_to_string(path),
        _ => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn print_help() {
    println!("Line-numbered BASIC interpreter");
    println!();
    println!("Usage: basic [--list] [FILE]");
    println!();
    println!("Reads the program from FILE, or standard input when FILE is omitted.");
    println!();
    println!("Options:");
    println!("  -l, --list   Print the program in line order before running it");
    println!("  -h, --help   Show this help");
    println!();
    println!("Statements:");
    println!("  10 REM comment              - Comment");
    println!("  20 LET x = a + b            - Assign (+ - * / % ^ == != < <= > >=)");
    println!("  30 PRINT x                  - Print a value");
    println!("  40 GOTO 20                  - Jump to line");
    println!("  50 IF x < 10 GOTO 20        - Jump when the comparison holds");
    println!();
    println!("Set RUST_LOG=debug to trace execution on stderr.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_no_args() {
        let options = parse_args(args(&[])).unwrap().unwrap();
        assert!(!options.list);
        assert!(options.path.is_none());
    }

    #[test]
    fn test_parse_file_and_list() {
        let options = parse_args(args(&["--list", "prog.bas"])).unwrap().unwrap();
        assert!(options.list);
        assert_eq!(options.path.as_deref(), Some("prog.bas"));
    }

    #[test]
    fn test_parse_too_many_arguments() {
        assert!(parse_args(args(&["a.bas", "b.bas"])).is_err());
    }

    #[test]
    fn test_parse_unknown_option() {
        assert!(parse_args(args(&["--fast"])).is_err());
    }

    #[test]
    fn test_parse_help() {
        assert!(parse_args(args(&["-h"])).unwrap().is_none());
    }
}
