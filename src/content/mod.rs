//! Static hunt content: quiz questions, code snippets, the buggy program,
//! riddles and the location clues shown between phases.
//!
//! Everything here is immutable and shared across requests. Types that hold an
//! answer never derive `Serialize` directly for the public routes; use the
//! `public` projections instead.

use serde::Serialize;

/// Phase 2 multiple-choice question.
#[derive(Debug)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: &'static str,
    pub options: &'static [&'static str],
    pub correct_answer: usize,
}

/// Quiz question as sent to clients.
#[derive(Debug, Serialize)]
pub struct PublicQuizQuestion {
    pub id: u32,
    pub question: &'static str,
    pub options: &'static [&'static str],
}

impl QuizQuestion {
    pub fn public(&self) -> PublicQuizQuestion {
        PublicQuizQuestion {
            id: self.id,
            question: self.question,
            options: self.options,
        }
    }
}

/// Phase 3 code-reading question. Serializes with its answer, which is only
/// sent back after a submission has been scored.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeQuestion {
    pub id: u32,
    pub code: &'static str,
    pub question: &'static str,
    pub options: &'static [&'static str],
    pub correct_answer: usize,
}

#[derive(Debug, Serialize)]
pub struct PublicCodeQuestion {
    pub id: u32,
    pub code: &'static str,
    pub question: &'static str,
    pub options: &'static [&'static str],
}

impl CodeQuestion {
    pub fn public(&self) -> PublicCodeQuestion {
        PublicCodeQuestion {
            id: self.id,
            code: self.code,
            question: self.question,
            options: self.options,
        }
    }
}

/// How a riddle is answered and checked.
#[derive(Debug)]
pub enum RiddleKind {
    Choice {
        options: &'static [&'static str],
        correct_answer: usize,
    },
    Text {
        accepted_answers: &'static [&'static str],
    },
}

/// Phase 5 challenge.
#[derive(Debug)]
pub struct Riddle {
    pub id: u32,
    pub riddle: &'static str,
    pub kind: RiddleKind,
}

#[derive(Debug, Serialize)]
pub struct PublicRiddle {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub riddle: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'static [&'static str]>,
}

impl Riddle {
    pub fn public(&self) -> PublicRiddle {
        let (kind, options) = match &self.kind {
            RiddleKind::Choice { options, .. } => ("mcq", Some(*options)),
            RiddleKind::Text { .. } => ("text", None),
        };
        PublicRiddle {
            id: self.id,
            kind,
            riddle: self.riddle,
            options,
        }
    }
}

/// Verse text of a location clue. Some stages point at two rooms and carry one
/// verse for each.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Verse {
    Single(&'static str),
    Multiple(&'static [&'static str]),
}

/// Clue revealed after finishing a phase, leading to the next physical location.
#[derive(Debug, Serialize)]
pub struct LocationRiddle {
    pub stage: u32,
    pub location: &'static str,
    pub english: Verse,
    pub hinglish: Verse,
}

/// Keyword every phase 1 prompt must contain.
pub const PROMPT_KEYWORD: &str = "VU2050";

/// Minimum phase 3 score needed to pass.
pub const CODE_READING_PASS_SCORE: u32 = 3;

/// Accepted phase 4 answers, compared after trimming and lower-casing.
pub const DEBUG_ACCEPTED_ANSWERS: [&str; 2] = ["factorial of 5: 120", "120"];

/// Room revealed when phase 4 is solved.
pub const DEBUG_ROOM: &str = "2101/2012";

pub static QUIZ_QUESTIONS: [QuizQuestion; 10] = [
    QuizQuestion {
        id: 1,
        question: "Generative AI is best described as AI that:",
        options: &["Creates new content", "Deletes information", "Only analyzes data", "Compresses files"],
        correct_answer: 0,
    },
    QuizQuestion {
        id: 2,
        question: "Which model architecture powers many modern text generators?",
        options: &["Binary Trees", "Hash Tables", "Transformers", "Bubble Sort"],
        correct_answer: 2,
    },
    QuizQuestion {
        id: 3,
        question: "What is a \"prompt\" in generative AI?",
        options: &["Storage device", "Hardware chip", "Antivirus software", "Input instruction given to the AI"],
        correct_answer: 3,
    },
    QuizQuestion {
        id: 4,
        question: "GAN stands for:",
        options: &["Graphical AI Node", "Generative Adversarial Network", "General Algorithm Network", "Global Access Network"],
        correct_answer: 1,
    },
    QuizQuestion {
        id: 5,
        question: "Which is a common use of generative AI in business?",
        options: &["Increasing paperwork", "Turning off servers", "Automated content creation", "Manual bookkeeping"],
        correct_answer: 2,
    },
    QuizQuestion {
        id: 6,
        question: "Deepfakes are created using:",
        options: &["Spreadsheet formulas", "Firewalls", "Rule-based coding only", "AI-generated synthetic media"],
        correct_answer: 3,
    },
    QuizQuestion {
        id: 7,
        question: "One benefit of generative AI in design is:",
        options: &["Rapid idea generation", "Eliminating creativity", "Slower prototyping", "Increasing cost always"],
        correct_answer: 0,
    },
    QuizQuestion {
        id: 8,
        question: "Which issue arises from AI-generated art?",
        options: &["Low battery", "Lack of internet", "Copyright and ownership concerns", "Keyboard failure"],
        correct_answer: 2,
    },
    QuizQuestion {
        id: 9,
        question: "Text-to-image models convert:",
        options: &["Audio into spreadsheets", "Videos into text only", "Text descriptions into visuals", "Images into code"],
        correct_answer: 2,
    },
    QuizQuestion {
        id: 10,
        question: "Temperature in text generation controls:",
        options: &["Screen brightness", "Hardware heat", "Download speed", "Randomness of output"],
        correct_answer: 3,
    },
];

pub static CODE_QUESTIONS: [CodeQuestion; 5] = [
    CodeQuestion {
        id: 1,
        code: "#include <stdio.h>\nint main() {\n    int a = 3, b = 5;\n    int c = ++a + b++;\n    printf(\"%d %d %d\", a, b, c);\n    return 0;\n}",
        question: "What will be the output of this code?",
        options: &["3 5 8", "4 6 9", "4 6 8", "3 6 8"],
        correct_answer: 1,
    },
    CodeQuestion {
        id: 2,
        code: "#include <stdio.h>\nint fib(int n) {\n    if (n <= 1) return n;\n    return fib(n - 1) + fib(n - 2);\n}\nint main() {\n    printf(\"%d\", fib(7));\n    return 0;\n}",
        question: "What will be the output of this code?",
        options: &["8", "13", "21", "34"],
        correct_answer: 1,
    },
    CodeQuestion {
        id: 3,
        code: "#include <stdio.h>\nint main() {\n    int x = 3;\n    switch (x) {\n        case 1: printf(\"One \");\n        case 2: printf(\"Two \");\n        case 3: printf(\"Three \");\n        case 4: printf(\"Four \");\n                break;\n        default: printf(\"None\");\n    }\n    return 0;\n}",
        question: "What will be the output of this code?",
        options: &["Three Four", "Three", "One Two Three Four", "None"],
        correct_answer: 0,
    },
    CodeQuestion {
        id: 4,
        code: "#include <stdio.h>\nint main() {\n    int arr[] = {10, 20, 30, 40, 50};\n    int *p = arr + 2;\n    printf(\"%d \", *p);\n    printf(\"%d \", *(p - 1));\n    printf(\"%d\", *(p + 2));\n    return 0;\n}",
        question: "What will be the output of this code?",
        options: &["20 10 40", "30 10 50", "30 20 50", "20 30 50"],
        correct_answer: 2,
    },
    CodeQuestion {
        id: 5,
        code: "#include <stdio.h>\nint main() {\n    char str[] = \"GenerativeAI\";\n    int upper = 0, lower = 0, i;\n    for (i = 0; str[i] != '\\0'; i++) {\n        if (str[i] >= 'A' && str[i] <= 'Z') upper++;\n        else if (str[i] >= 'a' && str[i] <= 'z') lower++;\n    }\n    printf(\"%d %d\", upper, lower);\n    return 0;\n}",
        question: "What will be the output of this code?",
        options: &["2 10", "3 9", "2 9", "3 10"],
        correct_answer: 0,
    },
];

/// Phase 4 program. Teams fix it and report what it prints.
pub const BUGGY_CODE: &str = r#"#include <stdio.h>

int factorial(int n) {
    if (n = 0)
        return 1;
    else
        return n * factorial(n - 1)
}

int main() {
    int num = 5;
    int result = factorial(num);
    prinft("Factorial of %d: %d\n", num, result);
    return 0;
}"#;

pub static RIDDLES: [Riddle; 3] = [
    Riddle {
        id: 1,
        riddle: "Study the maze below and find the ONLY path from S (Start) to E (Exit). Walls (#) block movement. You can only move Right (→) or Down (↓).\n\n    C0  C1  C2  C3  C4  C5\nR0: [S] [.] [#] [.] [.] [.]\nR1: [#] [.] [#] [#] [.] [.]\nR2: [#] [.] [.] [.] [#] [.]\nR3: [.] [#] [.] [#] [.] [#]\nR4: [#] [.] [#] [#] [.] [.]\nR5: [#] [#] [#] [#] [.] [E]\n\nWhich sequence of moves leads from S to E?",
        kind: RiddleKind::Choice {
            options: &[
                "→ ↓ ↓ → → ↓ ↓ → ↓ →",
                "→ ↓ ↓ → → ↓ → ↓ ↓ →",
                "→ ↓ → ↓ → → ↓ ↓ → ↓",
                "↓ → → ↓ → ↓ → ↓ ↓ →",
            ],
            correct_answer: 1,
        },
    },
    Riddle {
        id: 2,
        riddle: "LOGICAL DEDUCTION: Each Generative AI Tool is assigned exactly one Creative Function.\n\nAI Tools:\n  1. ArtForge\n  2. Promptly\n  3. VisionCrafter\n  4. StoryWeave\n\nCreative Functions:\n  A. Image Generation\n  B. Text Generation\n  C. Video Creation\n  D. Prompt Engineering\n\nClues:\n  • Promptly (2) is assigned to Prompt Engineering (D)\n  • ArtForge (1) is assigned to Image Generation (A)\n  • StoryWeave (4) is NOT assigned to A or D\n  • VisionCrafter (3) is NOT assigned to B\n\nWhat is the correct mapping?",
        kind: RiddleKind::Choice {
            options: &[
                "ArtForge→A, Promptly→D, VisionCrafter→B, StoryWeave→C",
                "ArtForge→A, Promptly→D, VisionCrafter→C, StoryWeave→B",
                "ArtForge→B, Promptly→D, VisionCrafter→C, StoryWeave→A",
                "ArtForge→A, Promptly→C, VisionCrafter→D, StoryWeave→B",
            ],
            correct_answer: 1,
        },
    },
    Riddle {
        id: 3,
        riddle: "PATTERN RECOGNITION\n\nStep 1 — Given Values:\n  A = 8,  B = 5,  C = 6,  D = 10\n\nStep 2 — Solve these expressions in order:\n  1) (2 × D) − 6\n  2) (1 × B)\n  3) (4 × C)\n  4) (4 × A) − 12\n  5) (1 × C) + 1\n  6) (1 × B)\n  7) (2 × D) − 6\n\nStep 3 — Convert each result to a letter using A1–Z26\n  (A=1, B=2, C=3 ... Z=26)\n\nWhat is the decoded keyword?",
        kind: RiddleKind::Text {
            accepted_answers: &["nextgen", "NEXTGEN", "NextGen"],
        },
    },
];

pub static LOCATION_RIDDLES: [LocationRiddle; 6] = [
    LocationRiddle {
        stage: 1,
        location: "Basketball Court",
        english: Verse::Single(
            "One ball, one hoop, one place to score,\nEchoes of bounce on the open floor.\nNo nets of books, just aim and run,\nFind the code where the matches are won.",
        ),
        hinglish: Verse::Single(
            "Ek ball, ek hoop, ek hi court,\nBounce ki awaaz ka hota hai report.\nBooks nahi, bas focus aur shot,\nGame wali jagah pe milega next plot.",
        ),
    },
    LocationRiddle {
        stage: 2,
        location: "Eco Campus Wall – 1st Building – After the Slope – Main Logo",
        english: Verse::Single(
            "Walk past the slope, take a steady climb,\nWhere green ideas met management in time.\nA wall that shows the campus name,\nLook near the symbol of college fame.",
        ),
        hinglish: Verse::Single(
            "Slope cross karke thoda aage jao,\nManagement aur eco ka combo pao.\nDeewar pe jahan college ka sign,\nLogo ke paas milega tumhara next line.",
        ),
    },
    LocationRiddle {
        stage: 3,
        location: "Main Canteen – Near Building 4",
        english: Verse::Single(
            "When hunger hits and crowds collide,\nThe biggest food stop stands with pride.\nNear the number four, always alive,\nPlates and plans here truly thrive.",
        ),
        hinglish: Verse::Single(
            "Jab bhookh lage aur crowd ho tight,\nSabse badi canteen stays in sight.\nFour ke paas jo hamesha alive,\nKhana aur clues dono yahin survive.",
        ),
    },
    LocationRiddle {
        stage: 4,
        location: "Lab 2101 & Lab 2012 – CS Lab",
        english: Verse::Multiple(&[
            "Climb one level, logic gets strong,\nScreens glow bright where coders belong.\nSyntax speaks, machines align,\nFirst floor hides the next design. (Lab 2101 – First Floor)",
            "From ground you start the digital race,\nKeyboards click in a focused space.\nWhere systems run and minds compile,\nThe lower lab hides the next file. (Lab 2012 – Ground Floor)",
        ]),
        hinglish: Verse::Multiple(&[
            "Ek floor upar, logic on fire,\nScreens aur code ka perfect choir.\nCS ka adda, focus lab divine,\nFirst floor pe milega next sign. (Lab 2101 – First Floor)",
            "Zameen se shuru hota coding ka track,\nKeyboard ki awaaz, full focus mode on pack.\nNeeche wale lab mein dimag align,\nGround floor pe milega agla sign. (Lab 2012 – Ground Floor)",
        ]),
    },
    LocationRiddle {
        stage: 5,
        location: "VU 7th Building – Law Building – Fire Extinguisher",
        english: Verse::Single(
            "Where rules are read and justice taught,\nThe number seven matters more than you thought.\nSafety stands silent, red and bright,\nCheck just behind to find your next light.",
        ),
        hinglish: Verse::Single(
            "Kanoon ki baatein, rules ka scene,\nSeven ka number makes it clean.\nRed safety guard jo corner mein khada,\nUske peeche hi raaz hai pada.",
        ),
    },
    LocationRiddle {
        stage: 6,
        location: "VU 2nd Building – Ground Floor – Under a Plant (Engg + Pharmacy)",
        english: Verse::Single(
            "Where campus paths cross, both science minds unite,\nEngineers and pharma learn from morning till night.\nOn the ground where green leaves quietly chant,\nLook down below, resting under a plant.",
        ),
        hinglish: Verse::Single(
            "Campus ke center mein jahan sabka flow hai,\nEngineer aur pharma ka common show hai.\nNeeche zameen par hariyali ka hint,\nPed ke neeche chhupa hai agla print.",
        ),
    },
];

pub fn riddle_by_id(id: u32) -> Option<&'static Riddle> {
    RIDDLES.iter().find(|r| r.id == id)
}

/// Location clue for stages 1 through 6.
pub fn location_riddle(stage: u32) -> Option<&'static LocationRiddle> {
    LOCATION_RIDDLES.iter().find(|r| r.stage == stage)
}
