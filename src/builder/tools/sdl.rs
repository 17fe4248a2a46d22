//! SDL configured through the `sdl2-config` script.
//!
//! Context keys live under `sdl_config`: `command`, `static`, `prefix`,
//! `exec_prefix` and `timeout`.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use crate::builder::contributor::{impl_contributor_typed, Contribute, HookTable};
use crate::builder::executor::CommandType;
use crate::builder::flags::{add_cflags, add_libs};
use crate::builder::tools::{configure_tool, ConfigTool, ToolOverrides, ToolSettings};
use crate::core::context::Context;
use crate::util::errors::Result;
use crate::util::process::ProcessRunner;

pub const DEFAULT_SDL_CONFIG_COMMAND: &str = "sdl2-config";

/// Context namespace read by [`SdlConfig`].
pub const SDL_CONFIG_NAMESPACE: &str = "sdl_config";

/// The SDL library, configured with the `sdl2-config` tool shipped in
/// SDL's development distribution.
///
/// Compile commands get `--cflags`; link commands get `--libs`, or
/// `--static-libs` when static linking is requested.
#[derive(Debug, Clone)]
pub struct SdlConfig {
    tool: ConfigTool,
}

impl SdlConfig {
    pub fn new() -> Self {
        SdlConfig {
            tool: ConfigTool::new(SDL_CONFIG_NAMESPACE, DEFAULT_SDL_CONFIG_COMMAND),
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.tool.overrides_mut().command = Some(command.into());
        self
    }

    pub fn with_static(mut self, static_libs: bool) -> Self {
        self.tool.overrides_mut().static_libs = Some(static_libs);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tool.overrides_mut().prefix = Some(prefix.into());
        self
    }

    pub fn with_exec_prefix(mut self, exec_prefix: impl Into<String>) -> Self {
        self.tool.overrides_mut().exec_prefix = Some(exec_prefix.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.tool.overrides_mut().timeout = Some(timeout);
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.tool = self.tool.with_runner(runner);
        self
    }

    pub fn overrides(&self) -> &ToolOverrides {
        self.tool.overrides()
    }

    /// Settings as they resolve in the current context.
    pub fn settings(&self) -> Result<ToolSettings> {
        self.tool.settings()
    }

    fn parse(&self, flag: &str, settings: &ToolSettings) -> Result<Vec<String>> {
        let mut process = self.tool.process(settings).arg(flag);
        if let Some(prefix) = &settings.prefix {
            process = process.arg(format!("--prefix={prefix}"));
        }
        if let Some(exec_prefix) = &settings.exec_prefix {
            process = process.arg(format!("--exec-prefix={exec_prefix}"));
        }
        self.tool.query(&process)
    }
}

impl Default for SdlConfig {
    fn default() -> Self {
        Self::new()
    }
}

static SDL_CONFIG_HOOKS: LazyLock<HookTable<SdlConfig>> = LazyLock::new(|| {
    HookTable::<SdlConfig>::new()
        .with(CommandType::COMPILE, |sdl, executor| {
            let settings = sdl.settings()?;
            let tokens = sdl.parse("--cflags", &settings)?;
            add_cflags(executor, &tokens);
            Ok(())
        })
        .with(CommandType::LINK, |sdl, executor| {
            let settings = sdl.settings()?;
            let flag = if settings.static_libs {
                "--static-libs"
            } else {
                "--libs"
            };
            let tokens = sdl.parse(flag, &settings)?;
            add_libs(executor, &tokens);
            Ok(())
        })
});

impl Contribute for SdlConfig {
    fn hook_table() -> &'static HookTable<Self> {
        &SDL_CONFIG_HOOKS
    }
}

impl_contributor_typed!(SdlConfig);

/// Store sdl2-config settings in the current context layer.
///
/// `command` defaults to `sdl2-config`; the other settings are cleared
/// when not given.
pub fn configure_sdl_config(overrides: &ToolOverrides) -> Result<()> {
    Context::current().configure(|layer| {
        configure_tool(layer, SDL_CONFIG_NAMESPACE, DEFAULT_SDL_CONFIG_COMMAND, overrides)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::builder::contributor::Contributor;
    use crate::builder::executor::{BuildInputs, Define};
    use crate::test_support::{MockProcessOutput, MockRunner};
    use crate::util::errors::{Error, ExternalToolError};

    fn sdl_with(runner: MockRunner) -> (SdlConfig, Arc<MockRunner>) {
        let runner = Arc::new(runner);
        (SdlConfig::new().with_runner(runner.clone()), runner)
    }

    #[test]
    fn test_cflags_become_two_structured_appends() {
        let runner = MockRunner::new();
        runner.expect(
            "sdl2-config --cflags",
            MockProcessOutput::success("-I/usr/include/SDL2 -D_REENTRANT\n"),
        );
        let (sdl, _) = sdl_with(runner);

        let _scope = Context::enter(false);
        let mut inputs = BuildInputs::new([CommandType::COMPILE]);
        sdl.add_to_command(&mut inputs).unwrap();

        assert_eq!(inputs.include_paths, vec![PathBuf::from("/usr/include/SDL2")]);
        assert_eq!(inputs.defines, vec![Define::flag("_REENTRANT")]);
        assert!(inputs.flags.is_empty());
        assert!(inputs.libraries.is_empty());
    }

    #[test]
    fn test_link_uses_static_libs_from_context() {
        let runner = MockRunner::new();
        runner.expect(
            "sdl2-config --static-libs --prefix=/opt/sdl",
            MockProcessOutput::success("-L/opt/sdl/lib -lSDL2 -lm -pthread"),
        );
        let (sdl, runner) = sdl_with(runner);

        let scope = Context::enter(false);
        scope.set("sdl_config.static", "on").unwrap();
        scope.set("sdl_config.prefix", "/opt/sdl").unwrap();

        let mut inputs = BuildInputs::new([CommandType::LINK]);
        sdl.add_to_command(&mut inputs).unwrap();

        assert_eq!(inputs.library_paths, vec![PathBuf::from("/opt/sdl/lib")]);
        assert_eq!(inputs.libraries, vec!["SDL2", "m"]);
        assert_eq!(inputs.flags, vec!["-pthread"]);
        assert_eq!(runner.calls(), vec!["sdl2-config --static-libs --prefix=/opt/sdl"]);
    }

    #[test]
    fn test_explicit_settings_beat_context() {
        let runner = MockRunner::new();
        runner.expect(
            "/usr/local/bin/sdl2-config --libs --exec-prefix=/x",
            MockProcessOutput::success("-lSDL2"),
        );
        let (sdl, _) = sdl_with(runner);
        let sdl = sdl
            .with_command("/usr/local/bin/sdl2-config")
            .with_static(false)
            .with_exec_prefix("/x");

        let scope = Context::enter(false);
        scope.set("sdl_config.static", true).unwrap();
        scope.set("sdl_config.command", "other-config").unwrap();

        let mut inputs = BuildInputs::new([CommandType::LINK]);
        sdl.add_to_command(&mut inputs).unwrap();
        assert_eq!(inputs.libraries, vec!["SDL2"]);
    }

    #[test]
    fn test_missing_tool_fails_without_mutation() {
        let (sdl, _) = sdl_with(MockRunner::new());

        let _scope = Context::enter(false);
        let mut inputs = BuildInputs::new([CommandType::COMPILE, CommandType::LINK]);
        let err = sdl.add_to_command(&mut inputs).unwrap_err();

        match err {
            Error::ExternalTool(e @ ExternalToolError::NotFound { .. }) => {
                assert_eq!(e.command_line(), "sdl2-config --cflags");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(inputs.is_empty());
    }

    #[test]
    fn test_configure_sdl_config_feeds_the_contributor() {
        let runner = MockRunner::new();
        runner.expect(
            "sdl2-config --static-libs",
            MockProcessOutput::success("-lSDL2"),
        );
        let (sdl, runner) = sdl_with(runner);

        let _scope = Context::enter(false);
        configure_sdl_config(&ToolOverrides {
            static_libs: Some(true),
            ..ToolOverrides::default()
        })
        .unwrap();

        let mut inputs = BuildInputs::new([CommandType::LINK]);
        sdl.add_to_command(&mut inputs).unwrap();
        assert_eq!(runner.calls(), vec!["sdl2-config --static-libs"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_real_script() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-sdl2-config");
        std::fs::write(
            &script,
            "#!/bin/sh\n\
             case \"$1\" in\n\
               --cflags) echo '-I/fake/include/SDL2 -D_REENTRANT' ;;\n\
               --libs) echo '-L/fake/lib -lSDL2' ;;\n\
               *) exit 3 ;;\n\
             esac\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let scope = Context::enter(false);
        scope.set("sdl_config.command", script.clone()).unwrap();

        let mut inputs = BuildInputs::new([CommandType::COMPILE, CommandType::LINK]);
        SdlConfig::new().add_to_command(&mut inputs).unwrap();
        assert_eq!(inputs.include_paths, vec![PathBuf::from("/fake/include/SDL2")]);
        assert_eq!(inputs.defines, vec![Define::flag("_REENTRANT")]);
        assert_eq!(inputs.library_paths, vec![PathBuf::from("/fake/lib")]);
        assert_eq!(inputs.libraries, vec!["SDL2"]);

        let err = SdlConfig::new()
            .with_static(true)
            .add_to_command(&mut BuildInputs::new([CommandType::LINK]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ExternalTool(ExternalToolError::Failed { code: Some(3), .. })
        ));
    }
}
