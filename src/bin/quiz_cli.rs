use anyhow::{anyhow, bail, Context};
use clap::Parser;
use quiz_backend::dto::quiz_dto::{GenerateQuizRequest, GenerateQuizResponse};
use quiz_backend::models::question::QuizQuestion;
use quiz_backend::models::quiz_config::{Category, QuizConfig};
use quiz_backend::services::scoring_service::ScoreReport;
use quiz_backend::services::session_service::{
    sync_with_clock, transition, QuizSession, SessionEvent, SessionStatus,
};
use quiz_backend::utils::time::{format_clock, Countdown, SystemClock, TimerUrgency};
use reqwest::Client;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use validator::Validate;

type InputLines = Lines<BufReader<Stdin>>;

/// Take an AI-generated quiz in the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the quiz backend
    #[arg(short, long, default_value = "http://127.0.0.1:5001")]
    server: String,

    /// VLSI, Verilog or "Digital Electronics"
    #[arg(short, long)]
    category: String,

    /// Number of questions (5-20)
    #[arg(short = 'n', long, default_value_t = 10)]
    count: u32,

    /// Time limit in minutes (1-30)
    #[arg(short, long, default_value_t = 2)]
    timer: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let category: Category = args.category.parse()?;
    let config = QuizConfig {
        category,
        timer: args.timer,
        question_count: args.count,
    };
    config.validate()?;

    let client = Client::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = QuizSession::new();

    loop {
        println!("Generating {} {} questions...", config.question_count, config.category);
        let questions = match fetch_questions(&client, &args.server, &config).await {
            Ok(questions) => questions,
            Err(e) => {
                println!("{}", e);
                if ask(&mut lines, "Try again? [y/N] ").await? {
                    continue;
                }
                return Ok(());
            }
        };

        session = transition(
            session,
            SessionEvent::Start {
                config: config.clone(),
                questions,
            },
        );
        if session.status() != SessionStatus::Taking {
            bail!("The server returned no usable questions");
        }

        session = take_quiz(session, &mut lines).await?;
        if let Some(report) = session.report() {
            print_report(&report);
        }

        if !ask(&mut lines, "Retake with fresh questions? [y/N] ").await? {
            return Ok(());
        }
        session = transition(session, SessionEvent::Retake);
    }
}

async fn fetch_questions(
    client: &Client,
    server: &str,
    config: &QuizConfig,
) -> anyhow::Result<Vec<QuizQuestion>> {
    let url = format!("{}/api/quiz/generate", server.trim_end_matches('/'));
    let res = client
        .post(&url)
        .json(&GenerateQuizRequest {
            category: config.category.label().to_string(),
            question_count: config.question_count,
        })
        .send()
        .await
        .with_context(|| format!("Could not reach {}", url))?;

    let status = res.status();
    if !status.is_success() {
        let body: serde_json::Value = res.json().await.unwrap_or_default();
        let message = body
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error");
        return Err(anyhow!("Question generation failed ({}): {}", status, message));
    }

    let body: GenerateQuizResponse = res.json().await?;
    Ok(body.questions)
}

async fn take_quiz(mut session: QuizSession, lines: &mut InputLines) -> anyhow::Result<QuizSession> {
    let clock = SystemClock;
    let mut countdown = Countdown::start(&clock);
    let mut ticker = tokio::time::interval(Duration::from_millis(250));
    let mut urgency = TimerUrgency::for_remaining(session.remaining_seconds());

    print_question(&session);
    while session.status() == SessionStatus::Taking {
        tokio::select! {
            _ = ticker.tick() => {
                session = sync_with_clock(session, &mut countdown, &clock);
                if session.status() == SessionStatus::Results {
                    println!("\nTime is up!");
                    break;
                }
                let now = TimerUrgency::for_remaining(session.remaining_seconds());
                if now != urgency {
                    urgency = now;
                    println!("\n[{} remaining]", format_clock(session.remaining_seconds()));
                }
            }
            line = lines.next_line() => {
                let line = line?.ok_or_else(|| anyhow!("Input closed before the quiz finished"))?;
                session = handle_input(session, line.trim());
            }
        }
    }
    Ok(session)
}

fn handle_input(session: QuizSession, input: &str) -> QuizSession {
    if session.has_answered_current() {
        let session = transition(session, SessionEvent::Advance);
        if session.status() == SessionStatus::Taking {
            print_question(&session);
        }
        return session;
    }

    let Some(option_index) = parse_choice(input) else {
        println!("Answer with A, B, C or D.");
        return session;
    };
    let session = transition(session, SessionEvent::Select { option_index });

    if let (Some(question), Some(selected)) = (session.current_question(), session.current_selection()) {
        let correct = question.correct_option_index();
        if correct == Some(selected) {
            println!("Correct!");
        } else if let Some(correct) = correct {
            println!(
                "Incorrect. The answer is {}) {}",
                QuizQuestion::option_label(correct),
                question.options[correct].text
            );
        }
        if session.is_last_question() {
            println!("Press Enter to view results.");
        } else {
            println!("Press Enter for the next question.");
        }
    }
    session
}

fn parse_choice(input: &str) -> Option<usize> {
    let mut chars = input.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match first.to_ascii_uppercase() {
        c @ 'A'..='D' => Some(c as usize - 'A' as usize),
        c @ '1'..='4' => Some(c as usize - '1' as usize),
        _ => None,
    }
}

fn print_question(session: &QuizSession) {
    let Some(question) = session.current_question() else {
        return;
    };
    println!(
        "\nQuestion {} of {}  [{}]",
        session.current_index() + 1,
        session.questions().len(),
        format_clock(session.remaining_seconds())
    );
    println!("{}", question.question);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}) {}", QuizQuestion::option_label(i), option.text);
    }
}

fn print_report(report: &ScoreReport) {
    println!(
        "\nQuiz complete: {}% ({} of {} correct) - {}",
        report.percentage,
        report.correct_count,
        report.total_questions,
        report.performance.label()
    );
    for review in &report.review {
        let mark = if review.is_correct { "[x]" } else { "[ ]" };
        let yours = review
            .selected_option
            .as_ref()
            .map(|o| o.text.as_str())
            .unwrap_or("(unanswered)");
        let correct = review
            .correct_option
            .as_ref()
            .map(|o| o.text.as_str())
            .unwrap_or("?");
        println!(
            "{} Q{}: {}\n    your answer: {}\n    correct:     {}",
            mark,
            review.question_index + 1,
            review.question,
            yours,
            correct
        );
    }
}

async fn ask(lines: &mut InputLines, prompt: &str) -> anyhow::Result<bool> {
    println!("{}", prompt);
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
