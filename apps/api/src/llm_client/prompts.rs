// Shared prompt fragments. Each task keeps its own templates in `ai::prompts`;
// only cross-cutting text lives here.

/// Appended to the system framing of every structured-output task.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every generation task that writes on the candidate's behalf.
pub const FACTUAL_INSTRUCTION: &str = "\
    Use ONLY facts present in the candidate profile. Do NOT invent employers, \
    dates, titles, degrees, metrics, or skills. If the profile does not support \
    a claim, leave it out.";
