//! Technology keyword detection over recognized/analyzed text

/// Keywords matched against recognition and vision output
const TECH_KEYWORDS: &[&str] = &[
    "React",
    "Vue",
    "Angular",
    "Next.js",
    "Svelte",
    "Node.js",
    "Express",
    "Python",
    "Django",
    "Flask",
    "FastAPI",
    "JavaScript",
    "TypeScript",
    "Java",
    "Spring",
    "C++",
    "C#",
    ".NET",
    "Go",
    "Rust",
    "PHP",
    "Ruby",
    "MongoDB",
    "PostgreSQL",
    "MySQL",
    "Redis",
    "Firebase",
    "Supabase",
    "Docker",
    "Kubernetes",
    "AWS",
    "Azure",
    "GCP",
    "Linux",
    "TensorFlow",
    "PyTorch",
    "Pandas",
    "NumPy",
    "OpenCV",
    "Git",
    "GitHub",
    "REST",
    "GraphQL",
    "API",
    "HTML",
    "CSS",
    "Tailwind",
    "Machine Learning",
    "Deep Learning",
    "AI",
    "NLP",
];

/// Extract known technology names appearing in the given text
///
/// Matching is case-insensitive; the returned list preserves keyword
/// order and contains no duplicates.
pub fn extract_technologies(text: &str) -> Vec<String> {
    let haystack = text.to_lowercase();
    TECH_KEYWORDS
        .iter()
        .filter(|tech| haystack.contains(&tech.to_lowercase()))
        .map(|tech| tech.to_string())
        .collect()
}
