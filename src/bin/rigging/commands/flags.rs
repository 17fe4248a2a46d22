//! `rigging flags` command

use anyhow::{bail, Result};

use crate::cli::{FlagsArgs, Tool};
use rigging::{BuildInputs, CommandType, Contributor, PkgConfig, SdlConfig};

pub fn execute(args: FlagsArgs) -> Result<()> {
    let _ctx = super::enter_context(&args.set)?;

    let contributor = build_contributor(&args)?;
    let mut inputs = BuildInputs::new(args.types.iter().cloned().map(CommandType::from));
    contributor.add_to_command(&mut inputs)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inputs)?);
    } else {
        print_text(&inputs);
    }
    Ok(())
}

fn build_contributor(args: &FlagsArgs) -> Result<Box<dyn Contributor>> {
    match args.tool {
        Tool::Sdl => {
            if !args.packages.is_empty() {
                bail!("--package is only used with --tool pkg-config");
            }
            let mut sdl = SdlConfig::new();
            if args.static_libs {
                sdl = sdl.with_static(true);
            }
            if let Some(command) = &args.command {
                sdl = sdl.with_command(command);
            }
            Ok(Box::new(sdl))
        }
        Tool::PkgConfig => {
            if args.packages.is_empty() {
                bail!(
                    "no packages given\n\
                     help: Pass one or more `--package <name>`"
                );
            }
            let mut pkg = PkgConfig::new(args.packages.iter().cloned());
            if args.static_libs {
                pkg = pkg.with_static(true);
            }
            if let Some(command) = &args.command {
                pkg = pkg.with_command(command);
            }
            Ok(Box::new(pkg))
        }
    }
}

fn print_text(inputs: &BuildInputs) {
    let types: Vec<&str> = inputs.command_types.iter().map(CommandType::as_str).collect();
    println!("# Inputs for: {}", types.join(", "));

    for path in &inputs.include_paths {
        println!("  -I{}", path.display());
    }
    for define in &inputs.defines {
        println!("  -D{}", define);
    }
    for path in &inputs.library_paths {
        println!("  -L{}", path.display());
    }
    for library in &inputs.libraries {
        println!("  -l{}", library);
    }
    for artifact in &inputs.result_libraries {
        println!("  {}", artifact.display());
    }
    for flag in &inputs.flags {
        println!("  {}", flag);
    }
}
