//! Deterministic skill extraction: pattern table to canonical skill names.
//!
//! Every rule is tried independently and contributes its canonical name when
//! it matches (set union). Overlapping rules such as bare `react` and
//! `react.js` both map to "React" and collapse in the set; they are not
//! mutually exclusive.
//!
//! The `regex` crate has no lookaround, so disambiguation is expressed as
//! guards checked against the text immediately after or before each match.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical skill names. Ordered so truncation to the first N is stable.
pub type SkillSet = BTreeSet<String>;

struct SkillRule {
    pattern: &'static str,
    canonical: &'static str,
    /// Reject a match when the text right after it matches this (anchored).
    not_followed_by: Option<&'static str>,
    /// Reject a match when the text right before it matches this (anchored).
    not_preceded_by: Option<&'static str>,
}

const fn rule(pattern: &'static str, canonical: &'static str) -> SkillRule {
    SkillRule {
        pattern,
        canonical,
        not_followed_by: None,
        not_preceded_by: None,
    }
}

impl SkillRule {
    const fn unless_followed_by(self, guard: &'static str) -> Self {
        SkillRule {
            not_followed_by: Some(guard),
            ..self
        }
    }

    const fn unless_preceded_by(self, guard: &'static str) -> Self {
        SkillRule {
            not_preceded_by: Some(guard),
            ..self
        }
    }
}

// Canonical names must re-extract to themselves (and nothing a rule would not
// already have produced from the source text), so `extract(join(extract(t)))`
// is a fixed point.
const SKILL_RULES: &[SkillRule] = &[
    // Languages
    rule(r"\bpython3?\b", "Python"),
    rule(r"\bjava\b", "Java").unless_followed_by(r"[\s-]*script\b"),
    rule(r"\bjavascript\b|\bjava[\s-]+script\b|\becmascript\b|\bes6\b", "JavaScript"),
    rule(r"\btypescript\b", "TypeScript"),
    rule(r"\bgolang\b|\bgo\s+(?:lang|language|programming)\b", "Golang"),
    rule(r"\brust\b", "Rust"),
    rule(r"\bkotlin\b", "Kotlin"),
    rule(r"\bswift\b", "Swift"),
    rule(r"\bscala\b", "Scala"),
    rule(r"\bruby\b", "Ruby"),
    rule(r"\bphp\b", "PHP"),
    rule(r"\bc\+\+", "C++"),
    rule(r"\bc#", "C#"),
    rule(r"\.net\b|\bdotnet\b", ".NET").unless_preceded_by(r"\w"),
    // Frameworks
    rule(r"\bnode\.?js\b", "Node.js"),
    rule(r"\breact\b", "React"),
    rule(r"\breact\.?js\b", "React"),
    rule(r"\breact[\s-]+native\b", "React Native"),
    rule(r"\bangular(?:\.?js)?\b", "Angular"),
    rule(r"\bvue(?:\.?js)?\b", "Vue"),
    rule(r"\bnext\.?js\b", "Next.js"),
    rule(r"\bexpress\.?js\b", "Express.js"),
    rule(r"\bdjango\b", "Django"),
    rule(r"\bflask\b", "Flask"),
    rule(r"\bfast\s?api\b", "FastAPI"),
    rule(r"\bspring(?:[\s-]+boot)?\b", "Spring"),
    rule(r"\b(?:ruby\s+on\s+)?rails\b", "Rails"),
    rule(r"\basp\.net\b", "ASP.NET"),
    // Data stores and messaging
    rule(r"\bsql\b", "SQL"),
    rule(r"\bpostgres(?:ql)?\b", "PostgreSQL"),
    rule(r"\bmysql\b", "MySQL"),
    rule(r"\bmongo(?:db)?\b", "MongoDB"),
    rule(r"\bredis\b", "Redis"),
    rule(r"\belastic\s?search\b", "Elasticsearch"),
    rule(r"\bdynamo\s?db\b", "DynamoDB"),
    rule(r"\bcassandra\b", "Cassandra"),
    rule(r"\bkafka\b", "Kafka"),
    rule(r"\brabbit\s?mq\b", "RabbitMQ"),
    // APIs and architecture
    rule(r"\bgraphql\b", "GraphQL"),
    rule(r"\bgrpc\b", "gRPC"),
    rule(r"\brest(?:ful)?(?:\s+|-)apis?\b|\brestful\b", "REST APIs"),
    rule(r"\bmicro-?services?\b", "Microservices"),
    // Cloud and delivery
    rule(r"\bdocker\b", "Docker"),
    rule(r"\bkubernetes\b|\bk8s\b", "Kubernetes"),
    rule(r"\bterraform\b", "Terraform"),
    rule(r"\bansible\b", "Ansible"),
    rule(r"\baws\b|\bamazon\s+web\s+services\b", "AWS"),
    rule(r"\bgcp\b|\bgoogle\s+cloud(?:\s+platform)?\b", "GCP"),
    rule(r"\bazure\b", "Azure"),
    rule(
        r"\bci\s*/\s*cd\b|\bcontinuous\s+(?:integration|delivery|deployment)\b",
        "CI/CD",
    ),
    rule(r"\bjenkins\b", "Jenkins"),
    rule(r"\bgit\b", "Git").unless_followed_by(r"[\s-]*(?:hub|lab)\b"),
    rule(r"\bgit[\s-]?hub\b", "GitHub"),
    rule(r"\bgithub\s+actions\b", "GitHub Actions"),
    rule(r"\bgit[\s-]?lab\b", "GitLab"),
    rule(r"\blinux\b", "Linux"),
    // Data and ML
    rule(r"\bmachine[\s-]+learning\b", "Machine Learning"),
    rule(r"\bdeep[\s-]+learning\b", "Deep Learning"),
    rule(r"\btensorflow\b", "TensorFlow"),
    rule(r"\bpytorch\b", "PyTorch"),
    rule(r"\bscikit[\s-]?learn\b|\bsklearn\b", "scikit-learn"),
    rule(r"\bpandas\b", "Pandas"),
    rule(r"\bnumpy\b", "NumPy"),
    rule(r"\b(?:apache\s+)?spark\b", "Spark"),
    rule(r"\bhadoop\b", "Hadoop"),
    rule(r"\bairflow\b", "Airflow"),
    // Front end
    rule(r"\bhtml5?\b", "HTML"),
    rule(r"\bcss3?\b", "CSS"),
    rule(r"\btailwind(?:\s*css)?\b", "Tailwind"),
    // Practice
    rule(r"\bagile\b|\bscrum\b", "Agile"),
];

struct CompiledRule {
    pattern: Regex,
    canonical: &'static str,
    not_followed_by: Option<Regex>,
    not_preceded_by: Option<Regex>,
}

impl CompiledRule {
    fn matches(&self, text: &str) -> bool {
        self.pattern.find_iter(text).any(|m| {
            let rejected_after = self
                .not_followed_by
                .as_ref()
                .is_some_and(|guard| guard.is_match(&text[m.end()..]));
            let rejected_before = self
                .not_preceded_by
                .as_ref()
                .is_some_and(|guard| guard.is_match(&text[..m.start()]));
            !rejected_after && !rejected_before
        })
    }
}

static RULES: Lazy<Vec<CompiledRule>> = Lazy::new(|| SKILL_RULES.iter().map(compile).collect());

// Patterns are compile-time constants; a bad one is caught by the tests below.
fn compile(rule: &SkillRule) -> CompiledRule {
    let build = |source: String| Regex::new(&source).expect("skill pattern table must compile");
    CompiledRule {
        pattern: build(format!("(?i){}", rule.pattern)),
        canonical: rule.canonical,
        not_followed_by: rule.not_followed_by.map(|g| build(format!("(?i)^(?:{g})"))),
        not_preceded_by: rule.not_preceded_by.map(|g| build(format!("(?i)(?:{g})$"))),
    }
}

/// Returns the canonical names of every rule that matches `text`.
/// Empty or whitespace-only input yields an empty set. Never fails.
pub fn extract_skills(text: &str) -> SkillSet {
    if text.trim().is_empty() {
        return SkillSet::new();
    }

    RULES
        .iter()
        .filter(|r| r.matches(text))
        .map(|r| r.canonical.to_string())
        .collect()
}

/// Renders a skill set back to text (`"Docker, Node.js"`).
#[cfg(test)]
pub fn skills_as_text(skills: &SkillSet) -> String {
    skills.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> SkillSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rule_table_compiles() {
        assert_eq!(RULES.len(), SKILL_RULES.len());
    }

    #[test]
    fn test_empty_and_whitespace_yield_empty_set() {
        assert!(extract_skills("").is_empty());
        assert!(extract_skills("  \n\t ").is_empty());
    }

    #[test]
    fn test_scenario_resume_and_job() {
        let resume = extract_skills("Node.js, PostgreSQL, Docker engineer");
        let job = extract_skills("Looking for Node.js, Docker, Kubernetes");
        assert_eq!(resume, set(&["Docker", "Node.js", "PostgreSQL"]));
        assert_eq!(job, set(&["Docker", "Kubernetes", "Node.js"]));
    }

    #[test]
    fn test_case_insensitive() {
        let text = "Built microservices in Golang and Python on AWS with k8s and CI/CD";
        let lower = extract_skills(&text.to_lowercase());
        assert_eq!(extract_skills(text), lower);
        assert_eq!(extract_skills(&text.to_uppercase()), lower);
        assert!(lower.contains("Kubernetes"));
        assert!(lower.contains("Golang"));
        assert!(lower.contains("CI/CD"));
    }

    #[test]
    fn test_extraction_is_a_fixed_point() {
        let samples = [
            "Senior engineer: React.js, React Native, Node.js, Express.js, TypeScript",
            "Java and JavaScript, C++, C#, ASP.NET and .NET on Azure",
            "git, GitHub Actions, GitLab CI, Jenkins, continuous delivery",
            "Ruby on Rails, PostgreSQL, MySQL, Redis, Kafka, RabbitMQ",
            "machine learning with scikit-learn, PyTorch, Apache Spark, pandas",
            "Tailwind CSS, HTML5, Next.js, Vue.js, Angular, RESTful APIs, gRPC",
            "Go programming, Rust, Kotlin, Amazon Web Services, Google Cloud Platform",
        ];
        for sample in samples {
            let once = extract_skills(sample);
            let twice = extract_skills(&skills_as_text(&once));
            assert_eq!(once, twice, "not a fixed point for: {sample}");
        }
    }

    #[test]
    fn test_java_is_not_javascript() {
        assert_eq!(extract_skills("JavaScript developer"), set(&["JavaScript"]));
        assert_eq!(extract_skills("Java Script"), set(&["JavaScript"]));
        assert_eq!(
            extract_skills("Java backend, JavaScript frontend"),
            set(&["Java", "JavaScript"])
        );
    }

    #[test]
    fn test_git_is_not_github() {
        assert_eq!(extract_skills("GitHub"), set(&["GitHub"]));
        assert_eq!(extract_skills("git hub"), set(&["GitHub"]));
        assert_eq!(extract_skills("git-lab pipelines"), set(&["GitLab"]));
        assert_eq!(extract_skills("git and GitHub"), set(&["Git", "GitHub"]));
    }

    #[test]
    fn test_dotnet_not_inside_a_word() {
        assert_eq!(extract_skills("ASP.NET MVC"), set(&["ASP.NET"]));
        assert_eq!(extract_skills("example.net"), SkillSet::new());
        assert_eq!(extract_skills(".NET Core"), set(&[".NET"]));
    }

    #[test]
    fn test_overlapping_patterns_union_without_double_count() {
        let skills = extract_skills("React and React.js and ReactJS");
        assert_eq!(skills, set(&["React"]));
    }

    #[test]
    fn test_synonyms_collapse_to_canonical_name() {
        assert_eq!(
            extract_skills("Postgres and PostgreSQL, Mongo and MongoDB"),
            set(&["MongoDB", "PostgreSQL"])
        );
    }

    #[test]
    fn test_word_boundaries_prevent_partial_matches() {
        // "sql" inside "mysql"/"postgresql" must not yield SQL.
        assert!(!extract_skills("MySQL and PostgreSQL").contains("SQL"));
        assert!(extract_skills("SQL and MySQL").contains("SQL"));
    }

    #[test]
    fn test_no_vocabulary_yields_empty_set() {
        assert!(extract_skills("Friendly team player who loves customers").is_empty());
    }

    #[test]
    fn test_skills_as_text_joins_in_order() {
        assert_eq!(skills_as_text(&set(&["Rust", "Docker"])), "Docker, Rust");
    }
}
