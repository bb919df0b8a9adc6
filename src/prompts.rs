//! Prompt templates for the three lesson flows.
//!
//! Each template pairs a static instruction block with a render function that
//! substitutes the flow's typed input. The summarize template carries the
//! strict Unstop output contract; its acceptance sentinel lives here too so the
//! prompt wording and the success predicate stay in one place.

/// Literal marker whose presence signals a format-compliant summary.
pub const UNSTOP_SENTINEL: &str = "<<Unstop>>";

pub const GENERATE_SYSTEM: &str = "You are an expert instructional designer who writes \
complete, engaging markdown lesson content from course slide scripts. You always answer \
with the markdown lesson itself, never with commentary about the task.";

const GENERATE_TEMPLATE: &str = r#"You are tasked with creating complete markdown-based lesson content for the subtopic below, based on the supplied slide content. The lesson should be engaging, interactive, and include real-life examples to enhance learner understanding.
The lesson should contain maximum 45000 words.

# Input

Lesson Name: {lesson_name}

Slide Content:
{slides_content}

# Process

1. Use the slide content and lesson name as the foundation for structuring the lesson; elaborate and rephrase where needed for clarity and engagement.
2. Create an organized flow: clear learning objectives, topic introduction and explanation, real-life scenarios or examples, and a closing summary or knowledge check.
3. Include questions, scenarios, or prompts for user interaction, with thought-provoking real-life examples or analogies.
4. Use markdown formatting (headers, lists, tables, bold, italics) for readability and hierarchy.
5. Keep language concise and approachable; anticipate and clarify likely learner questions.

# Output Format

Well-structured markdown containing:
1. A catchy title and a short introduction stating what the learner will achieve.
2. Sectioned content under markdown headings, with bullet points or numbered lists as needed.
3. At least two real-world relatable examples connected to the topic.
4. Interactive elements: questions, thought experiments, or short activities.
5. A concise summary reviewing the key points.
6. Optional additional resources for deeper understanding."#;

/// Render the generation prompt for one lesson.
pub fn render_generate(lesson_name: &str, slides_content: &str) -> String {
    GENERATE_TEMPLATE
        .replace("{lesson_name}", lesson_name)
        .replace("{slides_content}", slides_content)
}

pub const SUMMARIZE_SYSTEM: &str = "You are a meticulous course formatter. You reformat \
lesson material into the exact Unstop format you are given, never adding, removing, or \
renaming sections.";

const SUMMARIZE_TEMPLATE: &str = r#"**Instruction:**
Generate a detailed output in **Unstop format** for a course based on the provided JSON data.

**Input Data:**

{json_data}

The Unstop format data should be generated only from the script (JSON slides and/or textual lesson content), ensuring clarity, logical structure, and technical accuracy while using an engaging and interactive tone to promote learner interest.

The content must not exceed **45,000 words**.
The Unstop format will be used by an AI system to deliver an interactive Q&A experience for learners.

### Steps to Follow

1. Use only the transcript and textual lesson content provided in the JSON; summarize visual elements and preserve all code snippets exactly as given.
2. Break content into logical sections with clear headings and subheadings.
3. Write in a learner-centric, engaging tone while keeping technical precision; do not deviate from the provided script.
4. The output **must strictly follow** the Unstop format below. Do not add or remove sections. Do not change section titles.

### Unstop Format (STRICT)
"
<<Unstop>>

Here is the current lesson:

---

### [Module Title]
[Short, engaging introduction to the module topic.]

### What You'll Learn
[Key learning objectives in bullet points or a short paragraph.]

### Instructional Content
[Organized main content with subheadings. Include code snippets, visuals, and examples.]

#### Example Subsection Title
[Sample explanation or code block here.]

### Why It Matters
[Explain the real-world significance and applications of the module.]

### Learn by Doing
[Optional sample exercise or challenge for learners.]
"

### Notes

* Strict format compliance: do not modify the structure of the Unstop format.
* Preserve code, formulas, and technical details exactly as given in the JSON.
* Tone: engaging, motivational, and precise."#;

/// Render the summarize prompt around the JSON-serialized flow input.
pub fn render_summarize(json_data: &str) -> String {
    SUMMARIZE_TEMPLATE.replace("{json_data}", json_data)
}

const ESTIMATE_TEMPLATE: &str = r#"You are an expert at estimating processing times for AI lesson generation.

Given the number of lessons to generate, provide an estimated time in seconds.
Assume that each lesson takes approximately 10 seconds to generate.

Number of lessons: {number_of_lessons}

Respond with a JSON object of the form {"estimatedTimeSeconds": <number>} and nothing else."#;

/// Render the processing-time estimate prompt.
pub fn render_estimate(number_of_lessons: usize) -> String {
    ESTIMATE_TEMPLATE.replace("{number_of_lessons}", &number_of_lessons.to_string())
}
