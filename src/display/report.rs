use super::Terminal;
use crate::process::{Preparation, Process};
use crate::system::CommandSpec;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Human-readable summary of a detected process
pub fn render_process<Tz: TimeZone>(
    terminal: &Terminal,
    process: &Process,
    detected_at: &DateTime<Tz>,
) -> String
where
    Tz::Offset: Display,
{
    let runtime = process.runtime();
    let runtime_label = terminal.paint(&terminal.runtime_style(runtime), &runtime.to_string());

    format!(
        "PID:         {}\nRuntime:     {}\nExecutable:  {}\nPreparation: {}\nDetected:    {}\n",
        process.pid(),
        runtime_label,
        process.exe().display(),
        if process.needs_preparation() {
            "required"
        } else {
            "not needed"
        },
        detected_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

/// Command line plus the identity it runs as
pub fn render_command(command: &CommandSpec) -> String {
    match command.credentials {
        Some(credentials) => format!(
            "{} (as uid={} gid={})",
            command, credentials.uid, credentials.gid
        ),
        None => command.to_string(),
    }
}

pub fn render_preparation(preparation: &Preparation) -> String {
    match preparation {
        Preparation::NotNeeded => "No preparation needed.".to_string(),
        Preparation::Attached { command, output } => {
            let mut rendered = format!("Attached: {}", render_command(command));
            let output = output.trim();
            if !output.is_empty() {
                rendered.push('\n');
                rendered.push_str(output);
            }
            rendered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Runtime;
    use crate::system::Credentials;
    use chrono::Utc;
    use std::path::PathBuf;

    #[test]
    fn test_render_process() {
        let process = Process::new(42, PathBuf::from("/opt/jdk/bin/java"), Runtime::Java);
        let at = Utc.with_ymd_and_hms(2025, 9, 14, 16, 0, 3).unwrap();

        let rendered = render_process(&Terminal::plain(), &process, &at);
        assert_eq!(
            rendered,
            "PID:         42\n\
             Runtime:     java\n\
             Executable:  /opt/jdk/bin/java\n\
             Preparation: required\n\
             Detected:    2025-09-14 16:00:03\n"
        );
    }

    #[test]
    fn test_render_command() {
        let command = CommandSpec::new("/opt/jdk/bin/java").arg("-version");
        assert_eq!(render_command(&command), "/opt/jdk/bin/java -version");

        let command = command.run_as(Credentials { uid: 1000, gid: 50 });
        assert_eq!(
            render_command(&command),
            "/opt/jdk/bin/java -version (as uid=1000 gid=50)"
        );
    }

    #[test]
    fn test_render_preparation() {
        assert_eq!(
            render_preparation(&Preparation::NotNeeded),
            "No preparation needed."
        );

        let attached = Preparation::Attached {
            command: CommandSpec::new("java"),
            output: "done\n".to_string(),
        };
        assert_eq!(render_preparation(&attached), "Attached: java\ndone");
    }
}
