//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// System Architect CLI - Model functions, systems and expert judgments, and
/// score how well architectures satisfy them.
#[derive(Debug, Parser)]
#[command(name = "sysarch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Model data file (overrides the workspace's)
    #[arg(long, global = true, env = "SYSARCH_DATA")]
    pub data: Option<PathBuf>,

    /// Workspace to use
    #[arg(short, long, global = true)]
    pub workspace: Option<String>,

    /// Project to operate on (name or id)
    #[arg(short = 'P', long, global = true)]
    pub project: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage projects
    Project(ProjectArgs),

    /// Manage project goals
    Goal(GoalArgs),

    /// Manage the project glossary
    Term(TermArgs),

    /// Manage functions
    Function(NodeArgs),

    /// Manage systems
    System(NodeArgs),

    /// Manage scenarios
    Scenario(ScenarioArgs),

    /// Manage categories
    Category(CategoryArgs),

    /// Manage weighting scales
    Scale(ScaleArgs),

    /// Create relationships between functions and systems
    Relate(RelateArgs),

    /// List relationships of the project
    Relationships,

    /// Cast a vote on a relationship
    Vote(VoteArgs),

    /// Show the latest vote per expert on a relationship
    Votes(VotesArgs),

    /// Manage and score system architectures
    Architecture(ArchitectureArgs),

    /// Compute the shortfall of every function
    Shortfall(ShortfallArgs),

    /// Manage experts and organizations
    Expert(ExpertArgs),

    /// Bulk import records from a JSON file
    Import(ImportArgs),

    /// Create the "Make Toasts Great Again" demo project
    Seed(SeedArgs),

    /// Manage workspaces
    Workspace(WorkspaceArgs),
}

/// Arguments for project management.
#[derive(Debug, Parser)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub action: ProjectAction,
}

/// Project management actions.
#[derive(Debug, Subcommand)]
pub enum ProjectAction {
    /// Create a project
    Create {
        /// Project name
        name: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List all projects
    List,

    /// Show a project's contents
    Show {
        /// Project name or id (defaults to the selected project)
        project: Option<String>,
    },

    /// Delete a project and everything it owns
    Delete {
        /// Project name or id
        project: String,
        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Arguments for goal management.
#[derive(Debug, Parser)]
pub struct GoalArgs {
    #[command(subcommand)]
    pub action: GoalAction,
}

/// Goal actions.
#[derive(Debug, Subcommand)]
pub enum GoalAction {
    /// Add a goal
    Add {
        /// Goal name
        name: String,
        /// Short description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Narrative body
        #[arg(short, long, default_value = "")]
        body: String,
        /// Glossary terms clarifying the goal (repeatable)
        #[arg(short, long = "term")]
        terms: Vec<String>,
    },

    /// List goals
    List,
}

/// Arguments for glossary management.
#[derive(Debug, Parser)]
pub struct TermArgs {
    #[command(subcommand)]
    pub action: TermAction,
}

/// Glossary actions.
#[derive(Debug, Subcommand)]
pub enum TermAction {
    /// Add a term
    Add {
        /// The term
        name: String,
        /// Its definition
        definition: String,
    },

    /// List the glossary
    List,
}

/// Arguments shared by function and system management.
#[derive(Debug, Parser)]
pub struct NodeArgs {
    #[command(subcommand)]
    pub action: NodeAction,
}

/// Function/system actions.
#[derive(Debug, Subcommand)]
pub enum NodeAction {
    /// Add an entity
    Add {
        /// Name
        name: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Category names or ids (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,
    },

    /// List entities
    List,

    /// Delete an entity and every relationship touching it
    Delete {
        /// Name or id
        key: String,
    },
}

/// Arguments for scenario management.
#[derive(Debug, Parser)]
pub struct ScenarioArgs {
    #[command(subcommand)]
    pub action: ScenarioAction,
}

/// Scenario actions.
#[derive(Debug, Subcommand)]
pub enum ScenarioAction {
    /// Add a scenario
    Add {
        /// Scenario name
        name: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Broader scenario (name or id)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// List scenarios
    List,
}

/// Arguments for category management.
#[derive(Debug, Parser)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub action: CategoryAction,
}

/// Category actions.
#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    /// Add a category
    Add {
        /// Category name
        name: String,
        /// Entities the category may classify
        #[arg(short, long, value_enum, default_value = "both")]
        kind: KindArg,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Super-category (name or id)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// List categories
    List,
}

/// Category kind argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum KindArg {
    /// Functions only
    Functions,
    /// Systems only
    Systems,
    /// Functions and systems
    Both,
}

/// Arguments for scale management.
#[derive(Debug, Parser)]
pub struct ScaleArgs {
    #[command(subcommand)]
    pub action: ScaleAction,
}

/// Scale actions.
#[derive(Debug, Subcommand)]
pub enum ScaleAction {
    /// Add an empty scale
    Add {
        /// Scale name
        name: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Grading criteria
        #[arg(short, long, default_value = "")]
        criteria: String,
    },

    /// Add a level to a scale
    Level {
        /// Scale name or id
        scale: String,
        /// Level name
        name: String,
        /// Level value
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// List scales and their levels
    List,

    /// Add a standard scale, or list them when no name is given
    Preset {
        /// Preset name (e.g. Criticality, MoSCoW)
        name: Option<String>,
    },
}

/// Options common to every relationship.
#[derive(Debug, Args)]
pub struct EdgeOpts {
    /// Weighting scale judged on (name or id)
    #[arg(short, long)]
    pub scale: String,

    /// Scenario the relationship applies to (name or id)
    #[arg(long)]
    pub scenario: Option<String>,

    /// Notes
    #[arg(short, long, default_value = "")]
    pub notes: String,
}

/// Arguments for creating relationships.
#[derive(Debug, Parser)]
pub struct RelateArgs {
    #[command(subcommand)]
    pub action: RelateAction,
}

/// Relationship kinds.
#[derive(Debug, Subcommand)]
pub enum RelateAction {
    /// A function requires another function
    FunctionRequires {
        /// Requiring function
        requiring: String,
        /// Required function
        required: String,
        #[command(flatten)]
        opts: EdgeOpts,
    },

    /// A function satisfies another function
    FunctionSatisfies {
        /// Satisfying function
        satisfier: String,
        /// Satisfied function
        satisfied: String,
        #[command(flatten)]
        opts: EdgeOpts,
    },

    /// A system requires a function
    SystemRequires {
        /// Requiring system
        system: String,
        /// Required function
        function: String,
        #[command(flatten)]
        opts: EdgeOpts,
    },

    /// A system satisfies a function
    SystemSatisfies {
        /// Satisfying system
        system: String,
        /// Satisfied function
        function: String,
        #[command(flatten)]
        opts: EdgeOpts,
    },

    /// A system's satisfaction of a function requires another function
    SatisfactionRequires {
        /// System-satisfies relationship id
        relationship: String,
        /// Required function
        function: String,
        #[command(flatten)]
        opts: EdgeOpts,
    },

    /// Two system-satisfies relationships cannot coexist
    Incompatible {
        /// First relationship id
        first: String,
        /// Second relationship id
        second: String,
        /// Remove the incompatibility instead
        #[arg(long)]
        remove: bool,
    },
}

/// Arguments for the vote command.
#[derive(Debug, Parser)]
pub struct VoteArgs {
    /// Relationship id (or unique fragment)
    pub relationship: String,

    /// Level of the relationship's scale (name or id)
    pub level: String,

    /// Voting expert (account or id); anonymous when omitted
    #[arg(short, long)]
    pub expert: Option<String>,

    /// Confidence in the vote
    #[arg(short, long, value_enum, default_value = "high")]
    pub confidence: ConfidenceArg,

    /// Comments
    #[arg(long, default_value = "")]
    pub comments: String,
}

/// Confidence argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ConfidenceArg {
    /// High confidence
    High,
    /// Moderate confidence
    Moderate,
    /// Low confidence
    Low,
}

/// Arguments for the votes command.
#[derive(Debug, Parser)]
pub struct VotesArgs {
    /// Relationship id (or unique fragment)
    pub relationship: String,

    /// Show every vote, not only the latest per expert
    #[arg(short, long)]
    pub all: bool,
}

/// Arguments for architecture management.
#[derive(Debug, Parser)]
pub struct ArchitectureArgs {
    #[command(subcommand)]
    pub action: ArchitectureAction,
}

/// Architecture actions.
#[derive(Debug, Subcommand)]
pub enum ArchitectureAction {
    /// Create an architecture
    Create {
        /// Architecture name
        name: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Included systems (repeatable)
        #[arg(short, long = "system")]
        systems: Vec<String>,
    },

    /// Include a system in an architecture
    AddSystem {
        /// Architecture name or id
        architecture: String,
        /// System name or id
        system: String,
    },

    /// Exclude a system from an architecture
    RemoveSystem {
        /// Architecture name or id
        architecture: String,
        /// System name or id
        system: String,
    },

    /// List architectures
    List,

    /// Score the functional satisfaction of an architecture
    Score {
        /// Architecture name or id
        architecture: String,
        /// Count only edges of this scenario and its ancestors
        #[arg(long)]
        scenario: Option<String>,
    },

    /// List incompatible satisfiers present in an architecture
    Conflicts {
        /// Architecture name or id
        architecture: String,
    },
}

/// Arguments for the shortfall command.
#[derive(Debug, Parser)]
pub struct ShortfallArgs {
    /// Count only edges of this scenario and its ancestors
    #[arg(long)]
    pub scenario: Option<String>,
}

/// Arguments for expert management.
#[derive(Debug, Parser)]
pub struct ExpertArgs {
    #[command(subcommand)]
    pub action: ExpertAction,
}

/// Expert actions.
#[derive(Debug, Subcommand)]
pub enum ExpertAction {
    /// Create the expert profile for an account
    Create {
        /// Account name
        account: String,
        /// Job title
        #[arg(short, long, default_value = "")]
        title: String,
        /// Contact phone
        #[arg(long, default_value = "")]
        phone: String,
        /// Affiliated organization (created if needed)
        #[arg(short, long)]
        organization: Option<String>,
    },

    /// List experts
    List,

    /// Delete an expert; their votes become anonymous
    Delete {
        /// Account or id
        expert: String,
    },
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// What the file holds
    #[arg(value_enum)]
    pub kind: ImportKind,

    /// JSON file to import
    pub file: PathBuf,

    /// Stop at the first bad row
    #[arg(long)]
    pub fail_fast: bool,

    /// Resolve parent and category names only within the file
    #[arg(long)]
    pub batch_only: bool,
}

/// Import file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ImportKind {
    /// An object with arrays for every kind
    Batch,
    /// An array of categories
    Categories,
    /// An array of scales
    Scales,
    /// An array of scenarios
    Scenarios,
    /// An array of functions
    Functions,
    /// An array of systems
    Systems,
}

/// Arguments for the seed command.
#[derive(Debug, Parser)]
pub struct SeedArgs {
    /// Delete and recreate the demo project if it exists
    #[arg(long)]
    pub remake: bool,
}

/// Arguments for workspace management.
#[derive(Debug, Parser)]
pub struct WorkspaceArgs {
    #[command(subcommand)]
    pub action: WorkspaceAction,
}

/// Workspace actions.
#[derive(Debug, Subcommand)]
pub enum WorkspaceAction {
    /// List all workspaces
    List,

    /// Switch to a different workspace
    Use {
        /// Workspace name
        name: String,
    },

    /// Create or update a workspace
    Set {
        /// Workspace name
        name: String,
        /// Model data file
        #[arg(long)]
        data_file: PathBuf,
        /// Default project (name or id)
        #[arg(long)]
        project: Option<String>,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<KindArg> for sysarch_domain::CategoryKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Functions => sysarch_domain::CategoryKind::Functions,
            KindArg::Systems => sysarch_domain::CategoryKind::Systems,
            KindArg::Both => sysarch_domain::CategoryKind::Both,
        }
    }
}

impl From<ConfidenceArg> for sysarch_domain::Confidence {
    fn from(confidence: ConfidenceArg) -> Self {
        match confidence {
            ConfidenceArg::High => sysarch_domain::Confidence::High,
            ConfidenceArg::Moderate => sysarch_domain::Confidence::Moderate,
            ConfidenceArg::Low => sysarch_domain::Confidence::Low,
        }
    }
}
