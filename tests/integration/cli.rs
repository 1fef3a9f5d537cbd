use crate::support::{with_xdg_env, Workspace};
use skillmux::tooling::cli::{AgentCommands, CliContext, Commands, SkillCommands};

fn route(cli: &CliContext, query: &str, format: &str) -> String {
    cli.execute(&Commands::Route {
        query: query.split(' ').map(str::to_string).collect(),
        format: format.to_string(),
    })
    .unwrap()
}

#[test]
fn route_reports_workflow_agent_and_default() {
    let workspace = Workspace::new();
    with_xdg_env(workspace.root(), || {
        let cli = CliContext::new(workspace.root().to_path_buf(), None).unwrap();

        assert_eq!(route(&cli, "my obsidian notes", "text"), "Workflow: obsidian-integration");
        assert_eq!(route(&cli, "please research rust", "text"), "Agent: research_agent");
        assert_eq!(route(&cli, "hello there", "text"), "Agent: general_agent");

        let parsed: serde_json::Value =
            serde_json::from_str(&route(&cli, "dig into ferris", "json")).unwrap();
        assert_eq!(parsed["kind"], "agent");
        assert_eq!(parsed["name"], "research_agent");
    });
}

#[test]
fn agent_list_json_contract() {
    let workspace = Workspace::new();
    with_xdg_env(workspace.root(), || {
        let cli = CliContext::new(workspace.root().to_path_buf(), None).unwrap();
        let output = cli
            .execute(&Commands::Agent {
                command: AgentCommands::List {
                    format: "json".to_string(),
                },
            })
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["total"], 3);
        let names: Vec<&str> = parsed["agents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["doc_agent", "research_agent", "general_agent"]);
    });
}

#[test]
fn agent_validate_reports_missing_skill() {
    let workspace = Workspace::new();
    std::fs::remove_dir_all(workspace.skills_dir().join("open-research")).unwrap();
    with_xdg_env(workspace.root(), || {
        let cli = CliContext::new(workspace.root().to_path_buf(), None).unwrap();
        let validate = |name: &str| {
            cli.execute(&Commands::Agent {
                command: AgentCommands::Validate {
                    name: Some(name.to_string()),
                    all: false,
                    verbose: false,
                },
            })
            .unwrap()
        };

        assert!(validate("doc_agent").contains("Validation passed"));
        let output = validate("research_agent");
        assert!(output.contains("✗ Skill 'open-research' not found"));
        assert!(output.contains("Validation failed: 1 error(s) found"));
    });
}

#[test]
fn skill_list_and_show() {
    let workspace = Workspace::new();
    with_xdg_env(workspace.root(), || {
        let cli = CliContext::new(workspace.root().to_path_buf(), None).unwrap();
        let list = cli
            .execute(&Commands::Skill {
                command: SkillCommands::List {
                    format: "json".to_string(),
                },
            })
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&list).unwrap();
        assert_eq!(parsed["total"], 5);

        let body = cli
            .execute(&Commands::Skill {
                command: SkillCommands::Show {
                    name: "markdown-processing".to_string(),
                },
            })
            .unwrap();
        assert_eq!(body, "Markdown rules.");

        assert!(cli
            .execute(&Commands::Skill {
                command: SkillCommands::Show {
                    name: "missing".to_string(),
                },
            })
            .is_err());
    });
}

#[test]
fn config_masks_api_key() {
    let workspace = Workspace::new();
    let config_path = workspace.root().join("skillmux.toml");
    std::fs::write(
        &config_path,
        "[provider]\nprovider_type = \"openai\"\nendpoint = \"https://api.example.com/v1\"\napi_key = \"sk-secret\"\n",
    )
    .unwrap();
    with_xdg_env(workspace.root(), || {
        let cli = CliContext::new(workspace.root().to_path_buf(), Some(config_path.clone())).unwrap();
        let output = cli.execute(&Commands::Config).unwrap();
        assert!(output.contains("********"));
        assert!(!output.contains("sk-secret"));
    });
}
