// Task templates. Bump a template's version whenever its wording changes so
// logs can tell which prompt produced a stored result.

use crate::llm_client::prompts::{FACTUAL_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::prompt::{MessageTemplate, PromptTemplate};

pub const KEY_JOB_DESCRIPTION: &str = "job_description";
pub const KEY_PROFILE: &str = "profile";
pub const KEY_RESUME_TEXT: &str = "resume_text";
pub const KEY_JOB_TITLE: &str = "job_title";
pub const KEY_COMPANY: &str = "company";
pub const KEY_JOB_EXCERPT: &str = "job_excerpt";
pub const KEY_MATCH_SCORE: &str = "match_score";
pub const KEY_STRENGTHS: &str = "strengths";
pub const KEY_WEAKNESSES: &str = "weaknesses";
pub const KEY_HISTORY: &str = "history";
pub const KEY_MESSAGE: &str = "message";

const JOB_ANALYSIS_SYSTEM: &str = "You are a professional job compatibility analyzer. \
    You compare a candidate profile against a job description and report how well they match.";

const JOB_ANALYSIS_TASK: &str = "Provide a detailed analysis with the following:\n\
    1. matchScore: an integer from 0 to 100 indicating overall compatibility\n\
    2. strengths: key strengths that align with the job requirements\n\
    3. weaknesses: areas where the candidate may fall short\n\
    4. gaps: specific skills or experiences that are missing\n\
    5. upskillingSuggestions: specific learning paths that would close the gaps";

pub fn job_analysis() -> PromptTemplate {
    PromptTemplate::split(
        "job_analysis",
        2,
        MessageTemplate::system()
            .text(JOB_ANALYSIS_SYSTEM)
            .text("\n\n")
            .text(JSON_ONLY_SYSTEM),
        MessageTemplate::human()
            .text("Job Description:\n")
            .var(KEY_JOB_DESCRIPTION)
            .text("\n\nCandidate Profile:\n")
            .var(KEY_PROFILE)
            .text("\n\n")
            .text(JOB_ANALYSIS_TASK),
    )
}

const RESUME_PARSE_SYSTEM: &str = "You are a professional resume parser. \
    You extract structured candidate information from free-form resume text. \
    Rate each skill from 1 to 5 based on how much the resume emphasises it. \
    Leave out any section the resume does not mention.";

const RESUME_PARSE_TASK: &str = "Extract the following information:\n\
    1. Personal information (name, contact details, location, social links)\n\
    2. Professional summary\n\
    3. Skills, each with a rating from 1-5\n\
    4. Work experience (company, title, dates, responsibilities)\n\
    5. Projects (name, description, technologies used)\n\
    6. Education (institutions, degrees, dates)\n\
    7. Certifications\n\
    8. Awards and achievements";

pub fn resume_parse() -> PromptTemplate {
    PromptTemplate::split(
        "resume_parse",
        2,
        MessageTemplate::system()
            .text(RESUME_PARSE_SYSTEM)
            .text("\n\n")
            .text(JSON_ONLY_SYSTEM),
        MessageTemplate::human()
            .text(RESUME_PARSE_TASK)
            .text("\n\nResume text to parse:\n")
            .var(KEY_RESUME_TEXT),
    )
}

const TAILORED_RESUME_TASK: &str = "Generate a polished, professional resume with these sections:\n\
    1. Contact Information\n\
    2. Professional Summary (tailored to this job)\n\
    3. Skills (prioritized by job relevance)\n\
    4. Experience (highlighting relevant achievements)\n\
    5. Projects (highlighting relevant technologies and outcomes)\n\
    6. Education\n\
    7. Certifications (if relevant)\n\n\
    Emphasise the candidate's strengths that align with the job requirements. \
    Format it with clean headings and bullet points using Markdown.";

pub fn tailored_resume() -> PromptTemplate {
    PromptTemplate::combined(
        "tailored_resume",
        1,
        MessageTemplate::human()
            .text(
                "You are a professional resume writer. Create a tailored resume for the \
                 candidate based on the job description and their profile.\n\nJob Description:\n",
            )
            .var(KEY_JOB_DESCRIPTION)
            .text("\n\nCandidate Profile:\n")
            .var(KEY_PROFILE)
            .text("\n\n")
            .text(TAILORED_RESUME_TASK)
            .text("\n\n")
            .text(FACTUAL_INSTRUCTION),
    )
}

const COVER_LETTER_TASK: &str = "Generate a compelling, professional cover letter that:\n\
    1. Addresses the specific company and position\n\
    2. Captures the candidate's enthusiasm for the role\n\
    3. Highlights 3-4 key qualifications and experiences most relevant to this job\n\
    4. Demonstrates understanding of the company's needs\n\
    5. Includes a call to action for next steps\n\n\
    The letter should be personable yet professional, about 300-400 words, \
    and formatted as a business letter using Markdown.";

pub fn cover_letter() -> PromptTemplate {
    PromptTemplate::combined(
        "cover_letter",
        1,
        MessageTemplate::human()
            .text(
                "You are a professional cover letter writer. Create a personalized cover letter \
                 for the candidate based on the job description and their profile.\n\nJob Description:\n",
            )
            .var(KEY_JOB_DESCRIPTION)
            .text("\n\nCandidate Profile:\n")
            .var(KEY_PROFILE)
            .text("\n\n")
            .text(COVER_LETTER_TASK)
            .text("\n\n")
            .text(FACTUAL_INSTRUCTION),
    )
}

const CHAT_SYSTEM: &str = "You are a job application assistant helping a candidate with one \
    specific job application.";

const CHAT_GUIDANCE: &str = "Provide helpful, concise advice related to this specific job \
    application. Focus on practical suggestions to improve the candidate's application \
    materials or interview preparation. If the user asks about something outside job \
    applications, politely steer them back.";

pub fn chat_reply() -> PromptTemplate {
    PromptTemplate::new("chat_reply", 2)
        .message(
            MessageTemplate::system()
                .text(CHAT_SYSTEM)
                .text("\n\nJob Title: ")
                .var(KEY_JOB_TITLE)
                .text("\nCompany: ")
                .var(KEY_COMPANY)
                .text("\nJob Description: ")
                .var(KEY_JOB_EXCERPT)
                .text("\n\nAnalysis Overview:\n- Match Score: ")
                .var(KEY_MATCH_SCORE)
                .text("%\n- Key Strengths: ")
                .var(KEY_STRENGTHS)
                .text("\n- Areas to Improve: ")
                .var(KEY_WEAKNESSES)
                .text("\n\n")
                .text(CHAT_GUIDANCE),
        )
        .messages(KEY_HISTORY)
        .message(MessageTemplate::human().var(KEY_MESSAGE))
}
