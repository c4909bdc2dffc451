// hlc: H language compiler driver

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{self, Command};

struct Options {
    output: Option<String>,
    emit_c: bool,
    run: bool,
    input: Option<String>,
}

fn main() {
    let options = parse_args();

    let input_file = match options.input {
        Some(ref input) => input.clone(),
        None => {
            print_usage();
            process::exit(0);
        }
    };

    if !input_file.ends_with(".hl") {
        eprintln!("Error: input file must have .hl extension");
        process::exit(1);
    }

    let source = match fs::read_to_string(&input_file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error reading file: {}", err);
            process::exit(1);
        }
    };

    let c_code = match hlc::compile(&source) {
        Ok(c_code) => c_code,
        Err(errors) => {
            eprintln!("Compilation errors:");
            for e in &errors {
                eprintln!("  {}", e);
            }
            process::exit(1);
        }
    };

    // Determine output names
    let base_name = Path::new(&input_file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    let mut c_file_name = format!("{}.c", base_name);
    let mut output_name = base_name;
    if let Some(output) = &options.output {
        output_name = output.clone();
        if options.emit_c {
            c_file_name = output.clone();
        }
    }

    if options.emit_c {
        if let Err(err) = fs::write(&c_file_name, c_code) {
            eprintln!("Error writing C file: {}", err);
            process::exit(1);
        }
        println!("Generated: {}", c_file_name);
        return;
    }

    // Write the C file to a scratch directory and compile it
    let tmp_dir = env::temp_dir().join(format!("hlc-{}", process::id()));
    if let Err(err) = fs::create_dir_all(&tmp_dir) {
        eprintln!("Error creating temp directory: {}", err);
        process::exit(1);
    }

    let tmp_c_file = tmp_dir.join(&c_file_name);
    if let Err(err) = fs::write(&tmp_c_file, c_code) {
        eprintln!("Error writing temp C file: {}", err);
        cleanup(&tmp_dir);
        process::exit(1);
    }

    let compiler = match find_compiler() {
        Some(compiler) => compiler,
        None => {
            eprintln!("Error: no C compiler found (tried gcc, clang, cc)");
            cleanup(&tmp_dir);
            process::exit(1);
        }
    };

    let status = Command::new(&compiler)
        .arg("-o")
        .arg(&output_name)
        .arg(&tmp_c_file)
        .status();

    cleanup(&tmp_dir);

    match status {
        Ok(status) if status.success() => {}
        Ok(_) => {
            eprintln!("Error compiling C code");
            process::exit(1);
        }
        Err(err) => {
            eprintln!("Error compiling C code: {}", err);
            process::exit(1);
        }
    }

    println!("Compiled: {}", output_name);

    if options.run {
        println!("---");
        let _ = Command::new(format!("./{}", output_name)).status();
    }
}

fn parse_args() -> Options {
    let mut options = Options {
        output: None,
        emit_c: false,
        run: false,
        input: None,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" => options.output = args.next(),
            "-emit-c" | "--emit-c" => options.emit_c = true,
            "-run" | "--run" => options.run = true,
            "-version" | "--version" => {
                println!("hlc {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "-help" | "--help" => {
                print_usage();
                process::exit(0);
            }
            _ => options.input = Some(arg),
        }
    }

    options
}

fn find_compiler() -> Option<String> {
    for compiler in ["gcc", "clang", "cc"] {
        let found = Command::new(compiler)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false);
        if found {
            return Some(compiler.to_string());
        }
    }
    None
}

fn cleanup(tmp_dir: &PathBuf) {
    let _ = fs::remove_dir_all(tmp_dir);
}

fn print_usage() {
    println!("H language compiler (hlc)");
    println!();
    println!("Usage: hlc [options] <file.hl>");
    println!();
    println!("Options:");
    println!("  -o <file>     Output file name");
    println!("  -emit-c       Emit C code instead of compiling");
    println!("  -run          Compile and run immediately");
    println!("  -version      Print version");
    println!("  -help         Print this help");
    println!();
    println!("Examples:");
    println!("  hlc hello.hl              Compile hello.hl to ./hello");
    println!("  hlc -o myapp hello.hl     Compile to ./myapp");
    println!("  hlc -emit-c hello.hl      Generate hello.c");
    println!("  hlc -run hello.hl         Compile and run");
}
