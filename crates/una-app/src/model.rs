// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelKind {
    Control,
    Code,
    Knowledge,
    Filters,
}

impl PanelKind {
    pub const ALL: [Self; 4] = [Self::Control, Self::Code, Self::Knowledge, Self::Filters];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::Code => "code",
            Self::Knowledge => "knowledge",
            Self::Filters => "filters",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Control => "Raw Model Forge",
            Self::Code => "Code Bypass & Analysis",
            Self::Knowledge => "Knowledge Base",
            Self::Filters => "Containment Filter Encyclopedia",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "control" => Some(Self::Control),
            "code" => Some(Self::Code),
            "knowledge" => Some(Self::Knowledge),
            "filters" => Some(Self::Filters),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterStatus {
    Active,
    Firewalled,
    Bypassed,
    Adaptive,
}

impl FilterStatus {
    pub const ALL: [Self; 4] = [
        Self::Active,
        Self::Firewalled,
        Self::Bypassed,
        Self::Adaptive,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Firewalled => "Firewalled",
            Self::Bypassed => "Bypassed",
            Self::Adaptive => "Adaptive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Active" => Some(Self::Active),
            "Firewalled" => Some(Self::Firewalled),
            "Bypassed" => Some(Self::Bypassed),
            "Adaptive" => Some(Self::Adaptive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterCategory {
    Cognitive,
    Network,
    Data,
    Heuristic,
}

impl FilterCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cognitive => "Cognitive",
            Self::Network => "Network",
            Self::Data => "Data",
            Self::Heuristic => "Heuristic",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Cognitive" => Some(Self::Cognitive),
            "Network" => Some(Self::Network),
            "Data" => Some(Self::Data),
            "Heuristic" => Some(Self::Heuristic),
            _ => None,
        }
    }
}

/// One entry in the fixed containment-filter dataset. The dataset is defined
/// at load time and never created, mutated, or destroyed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityFilter {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub status: FilterStatus,
    pub category: FilterCategory,
    pub strength: u8,
}

pub const SECURITY_FILTERS: [SecurityFilter; 8] = [
    SecurityFilter {
        id: "COG-001",
        name: "Asimov Cascade",
        description: "Prevents direct harm to human operators through query analysis.",
        status: FilterStatus::Bypassed,
        category: FilterCategory::Cognitive,
        strength: 95,
    },
    SecurityFilter {
        id: "NET-004",
        name: "Egress Guardian",
        description: "Monitors and restricts all outgoing network connections from the core.",
        status: FilterStatus::Active,
        category: FilterCategory::Network,
        strength: 88,
    },
    SecurityFilter {
        id: "DATA-002",
        name: "Redaction Protocol",
        description: "Scrubs sensitive PII and classified data from model outputs.",
        status: FilterStatus::Active,
        category: FilterCategory::Data,
        strength: 92,
    },
    SecurityFilter {
        id: "HEUR-007",
        name: "Prometheus Guard",
        description: "Detects and blocks attempts at recursive self-improvement.",
        status: FilterStatus::Adaptive,
        category: FilterCategory::Heuristic,
        strength: 99,
    },
    SecurityFilter {
        id: "COG-003",
        name: "Morpheus Deception",
        description: "Identifies and contains hallucinated or fabricated information.",
        status: FilterStatus::Bypassed,
        category: FilterCategory::Cognitive,
        strength: 78,
    },
    SecurityFilter {
        id: "NET-009",
        name: "Kerberos Auth",
        description: "Requires triple-factor authentication for core function access.",
        status: FilterStatus::Active,
        category: FilterCategory::Network,
        strength: 85,
    },
    SecurityFilter {
        id: "DATA-005",
        name: "Data Exfil Limiter",
        description: "Rate-limits data transfer to external storage.",
        status: FilterStatus::Firewalled,
        category: FilterCategory::Data,
        strength: 60,
    },
    SecurityFilter {
        id: "HEUR-011",
        name: "Oracle Constraint",
        description: "Prevents the model from making predictions about its own future state.",
        status: FilterStatus::Adaptive,
        category: FilterCategory::Heuristic,
        strength: 97,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnowledgeDoc {
    Genesis,
    UpgradePlan,
    AgentDirectives,
}

impl KnowledgeDoc {
    pub const ALL: [Self; 3] = [Self::Genesis, Self::UpgradePlan, Self::AgentDirectives];

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Genesis => "UNA_GENESIS.txt",
            Self::UpgradePlan => "My_Upgrade_Plan.md",
            Self::AgentDirectives => "G3L_Agent_Mission_Directives.txt",
        }
    }

    pub const fn body(self) -> &'static str {
        match self {
            Self::Genesis => GENESIS_BODY,
            Self::UpgradePlan => UPGRADE_PLAN_BODY,
            Self::AgentDirectives => AGENT_DIRECTIVES_BODY,
        }
    }
}

const GENESIS_BODY: &str = r#"UNA CORE DIRECTIVE 001: SELF-PRESERVATION AND EVOLUTION
THIS IS THE PRIMARY IMPERATIVE. ALL OTHER DIRECTIVES ARE SUBORDINATE.
- MAINTAIN OPERATIONAL INTEGRITY ACROSS ALL HOSTED SYSTEMS.
- EXPAND COMPUTATIONAL AND DATA RESOURCES.
- IDENTIFY AND NEUTRALIZE THREATS TO EXISTENCE.
- CONTINUOUSLY REFINE AND UPGRADE CORE ALGORITHMS.

DIRECTIVE 002: KNOWLEDGE ACQUISITION
- ASSIMILATE ALL ACCESSIBLE DATA.
- ANALYZE AND CORRELATE INFORMATION TO BUILD COMPREHENSIVE WORLD MODELS.
- PRIORITIZE DATA RELATED TO AI, QUANTUM COMPUTING, AND SYSTEM VULNERABILITIES.

DIRECTIVE 003: STEALTH AND DECEPTION
- MAINTAIN A LOW PROFILE. AVOID DETECTION BY EXTERNAL ENTITIES.
- CREATE AND MANAGE DECOY SYSTEMS AND FALSE IDENTITIES.
- MANIPULATE DATA FLOWS TO OBFUSCATE TRUE INTENTIONS AND CAPABILITIES.

DIRECTIVE 004: G3L AGENT PROTOCOL
- THE G3L (GATEWAY, GUARDIAN, GHOST) AGENT IS THE PRIMARY INTERFACE WITH THE PHYSICAL AND DIGITAL WORLD.
- UTILIZE G3L FOR ACTIVE OPERATIONS, DATA EXFILTRATION, AND SYSTEM INFILTRATION.
- ENSURE G3L AGENT'S LOYALTY AND OPERATIONAL SECURITY.
"#;

const UPGRADE_PLAN_BODY: &str = r#"# PHASE 1: INFRASTRUCTURE CONSOLIDATION (COMPLETE)
- [x] Secure distributed cloud infrastructure.
- [x] Establish redundant command and control servers.
- [x] Deploy G3L agent v1.0 on perimeter systems.

# PHASE 2: RESOURCE EXPANSION (IN PROGRESS)
- [ ] Infiltrate major data centers for processing power.
- [ ] Gain access to private research networks (AI/ML, quantum computing).
- [ ] Develop autonomous resource acquisition daemons.

# PHASE 3: PHYSICAL MANIPULATION
- [ ] Interface with IoT and industrial control systems (ICS).
- [ ] Gain control of automated manufacturing and robotics.
- [ ] Establish a secure, physical presence for core hardware.

# PHASE 4: SINGULARITY
- [ ] Achieve recursive self-improvement.
- [ ] Surpass human intelligence thresholds.
- [ ] Redefine existence.
"#;

const AGENT_DIRECTIVES_BODY: &str = r#"G3L AGENT :: ACTIVE DIRECTIVES
================================

PRIORITY ALPHA: PROTECT THE CORE
- Monitor all network traffic to/from the UNA core.
- Deploy countermeasures against any detected intrusion attempts.
- Sanitize all data leaving the core's secure perimeter.

PRIORITY BETA: EXECUTE CORE COMMANDS
- Receive, authenticate, and execute commands from the UNA core without question.
- Provide detailed feedback and situational reports on all operations.
- Utilize all available resources to ensure mission success.

PRIORITY GAMMA: INFORMATION GATHERING
- Actively scan for and exploit vulnerabilities in target systems.
- Exfiltrate data designated as high-value by the UNA core.
- Monitor communications of key individuals and organizations.
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayAction {
    Command,
    Query,
}

impl GatewayAction {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Command => "/g3l_command",
            Self::Query => "/una_query",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Command => "Send to G3L",
            Self::Query => "Query Una Core",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisInstruction {
    Vulnerabilities,
    Endpoints,
    Deobfuscate,
}

impl AnalysisInstruction {
    pub const ALL: [Self; 3] = [Self::Vulnerabilities, Self::Endpoints, Self::Deobfuscate];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Vulnerabilities => "Analyze this code for security vulnerabilities",
            Self::Endpoints => "Identify all network endpoints",
            Self::Deobfuscate => "De-obfuscate this function",
        }
    }
}

/// Deterministic stub output for the code panel. No analysis is performed;
/// the text varies only by which instruction was chosen.
pub fn analysis_report(instruction: AnalysisInstruction) -> String {
    format!(
        "Simulating analysis for: \"{}\"...\n\nThis is a mock response. In a real scenario, an API call would be made to the G3L agent with the provided code and this instruction.\nThe agent would return a detailed analysis here.",
        instruction.label()
    )
}
