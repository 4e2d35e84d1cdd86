use colored::Colorize;
use tracing::instrument;

use crate::App;
use crate::Recipe;
use crate::error::Error;
use crate::error::Result;
use crate::ops::git::GitOps;
use crate::ops::shell::ShellOps;

impl<G: GitOps, S: ShellOps> App<G, S> {
    /// Run every step of `recipe` in order.
    ///
    /// Stops at the first failing step and returns its error. Whatever earlier
    /// steps changed on disk stays changed.
    #[instrument(skip_all, fields(path = %recipe.path.display()))]
    pub async fn cmd_build(&self, recipe: &Recipe, stdout: &mut impl std::io::Write) -> Result<()> {
        let steps = recipe.get_all_operations()?;
        let total = steps.len();

        for (index, step) in steps.iter().enumerate() {
            let progress = format!("[{}/{}]", index + 1, total);
            writeln!(stdout, "{} {}", progress.cyan(), step).map_err(Error::Output)?;
            step.run(&self.git, &self.shell).await?;
        }

        writeln!(stdout, "{}", "Done".green()).map_err(Error::Output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use mockall::Sequence;

    use crate::App;
    use crate::Recipe;
    use crate::error::Error;
    use crate::ops::git::MockGitOps;
    use crate::ops::shell::CommandOutput;
    use crate::ops::shell::MockShellOps;
    use crate::recipe::UPSTREAM_URL;
    use crate::remote::name_for;

    fn ok_output() -> CommandOutput {
        CommandOutput {
            success: true,
            status: "exit status: 0".to_string(),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Expect the setup steps for a path that doesn't exist yet, in order.
    fn expect_fresh_setup(git: &mut MockGitOps, seq: &mut Sequence) {
        git.expect_clone_repo()
            .withf(|url, _| url == UPSTREAM_URL)
            .times(1)
            .in_sequence(seq)
            .returning(|_, _| Ok(()));
        git.expect_remotes()
            .times(1)
            .in_sequence(seq)
            .returning(|_| Ok(vec!["origin".to_string()]));
        git.expect_remote_add()
            .times(1)
            .in_sequence(seq)
            .returning(|_, _, _| Ok(()));
        git.expect_fetch()
            .times(1)
            .in_sequence(seq)
            .returning(|_, _, _| Ok(()));
        git.expect_checkout()
            .withf(|_, rev| rev == format!("{}/master", name_for(UPSTREAM_URL)))
            .times(1)
            .in_sequence(seq)
            .returning(|_, _| Ok(()));
        git.expect_submodule_sync()
            .times(1)
            .in_sequence(seq)
            .returning(|_| Ok(()));
        git.expect_submodule_update()
            .times(1)
            .in_sequence(seq)
            .returning(|_| Ok(()));
    }

    #[tokio::test]
    async fn test_cmd_build_empty_recipe_runs_setup_only() {
        let recipe =
            Recipe::from_json(r#"{"path": "/nonexistent/fw", "operations": []}"#).unwrap();

        let mut seq = Sequence::new();
        let mut git = MockGitOps::new();
        expect_fresh_setup(&mut git, &mut seq);

        let app = App::new(git, MockShellOps::new());
        let mut stdout = Vec::new();
        app.cmd_build(&recipe, &mut stdout).await.unwrap();

        insta::assert_snapshot!(String::from_utf8(stdout).unwrap(), @r"
        [1/3] Cloning https://github.com/qmk/qmk_firmware
        [2/3] Swapping to 'master'
        [3/3] Synchronizing submodules
        Done
        ");
    }

    #[tokio::test]
    async fn test_cmd_build_runs_exec_in_recipe_path() {
        let recipe = Recipe::from_json(
            r#"{
                "path": "/nonexistent/fw",
                "operations": [{"operation": "exec", "cmd": "echo hi", "path": "/nonexistent/fw"}]
            }"#,
        )
        .unwrap();

        let mut seq = Sequence::new();
        let mut git = MockGitOps::new();
        expect_fresh_setup(&mut git, &mut seq);

        let mut shell = MockShellOps::new();
        shell
            .expect_run()
            .withf(|cmd, cwd| cmd == "echo hi" && cwd == Path::new("/nonexistent/fw"))
            .times(1)
            .returning(|_, _| Ok(ok_output()));

        let app = App::new(git, shell);
        let mut stdout = Vec::new();
        app.cmd_build(&recipe, &mut stdout).await.unwrap();
    }

    #[tokio::test]
    async fn test_cmd_build_stops_at_stop() {
        let recipe = Recipe::from_json(
            r#"{
                "path": "/nonexistent/fw",
                "operations": [
                    {"operation": "exec", "cmd": "make", "path": "/nonexistent/fw"},
                    {"operation": "stop"},
                    {"operation": "exec", "cmd": "make flash", "path": "/nonexistent/fw"}
                ]
            }"#,
        )
        .unwrap();

        let mut seq = Sequence::new();
        let mut git = MockGitOps::new();
        expect_fresh_setup(&mut git, &mut seq);

        let mut shell = MockShellOps::new();
        shell
            .expect_run()
            .withf(|cmd, _| cmd == "make")
            .times(1)
            .returning(|_, _| Ok(ok_output()));
        shell
            .expect_run()
            .withf(|cmd, _| cmd == "make flash")
            .never();

        let app = App::new(git, shell);
        let mut stdout = Vec::new();
        let err = app.cmd_build(&recipe, &mut stdout).await.unwrap_err();

        assert!(matches!(err, Error::Stopped));
        let out = String::from_utf8(stdout).unwrap();
        assert!(out.contains("[5/6] stop"));
        assert!(!out.contains("make flash"));
        assert!(!out.contains("Done"));
    }

    #[tokio::test]
    async fn test_cmd_build_setup_failure_skips_everything_else() {
        let recipe = Recipe::from_json(
            r#"{
                "path": "/nonexistent/fw",
                "operations": [{"operation": "exec", "cmd": "make", "path": "/nonexistent/fw"}]
            }"#,
        )
        .unwrap();

        let mut git = MockGitOps::new();
        git.expect_clone_repo().times(1).returning(|_, _| {
            Err(Error::Git {
                args: "clone".to_string(),
                stderr: "fatal: unable to access".to_string(),
            })
        });
        git.expect_checkout().never();
        git.expect_submodule_sync().never();

        let mut shell = MockShellOps::new();
        shell.expect_run().never();

        let app = App::new(git, shell);
        let mut stdout = Vec::new();
        let err = app.cmd_build(&recipe, &mut stdout).await.unwrap_err();
        assert!(err.to_string().contains("unable to access"));
    }

    #[tokio::test]
    async fn test_cmd_build_unknown_operation_runs_nothing() {
        let recipe = Recipe::from_json(
            r#"{
                "path": "/nonexistent/fw",
                "operations": [
                    {"operation": "exec", "cmd": "make", "path": "/nonexistent/fw"},
                    {"operation": "frobnicate"}
                ]
            }"#,
        )
        .unwrap();

        // No expectations: any collaborator call would panic.
        let app = App::new(MockGitOps::new(), MockShellOps::new());
        let mut stdout = Vec::new();
        let err = app.cmd_build(&recipe, &mut stdout).await.unwrap_err();

        assert_eq!(err.to_string(), "Unknown operation 'frobnicate'");
        assert!(stdout.is_empty());
    }
}
