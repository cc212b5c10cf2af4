use std::io::Write;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use training_hub::client::{ClientError, HubClient};
use training_hub::models::browser::LaunchOptions;
use training_hub::models::course::CoursePlan;
use training_hub::models::quiz_session::{OptionFeedback, QuizError, QuizSession};

type Input = Lines<BufReader<Stdin>>;

#[derive(Parser, Debug)]
#[command(name = "hub", version, about = "Build training courses from live websites")]
struct Cli {
    /// Base address of the builder API
    #[arg(long, env = "HUB_API_URL", default_value = "http://127.0.0.1:8000", global = true)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a visible browser, log in by hand and save the session cookies
    Learn {
        #[arg(long)]
        url: String,
    },
    /// Capture a page with the saved session
    Scrape {
        #[arg(long)]
        url: String,
    },
    /// Generate a course outline from the latest scrape
    Plan,
    /// Show the current course outline
    Course,
    /// Generate a lesson, optionally with a video and a quiz
    Lesson {
        #[arg(long)]
        title: String,
        /// Module the lesson belongs to; looked up in the current course when omitted
        #[arg(long)]
        module: Option<String>,
        #[arg(long)]
        video: bool,
        #[arg(long)]
        quiz: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    training_hub::telemetry::init_cli_tracing();

    let cli = Cli::parse();
    let client = HubClient::new(&cli.api_url)?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    match cli.command {
        Command::Learn { url } => learn(&client, &mut input, &url).await,
        Command::Scrape { url } => scrape(&client, &url).await,
        Command::Plan => {
            let plan = client.generate_plan().await?;
            print_plan(&plan);
            Ok(())
        }
        Command::Course => match client.current_course().await {
            Ok(plan) => {
                print_plan(&plan);
                Ok(())
            }
            Err(ClientError::Api { status: 404, .. }) => {
                println!("No course plan yet. Run `hub scrape` and `hub plan` first.");
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
        Command::Lesson {
            title,
            module,
            video,
            quiz,
        } => {
            let module = match module {
                Some(module) => module,
                None => resolve_module(&client, &title).await?,
            };
            lesson(&client, &mut input, &title, &module, video, quiz).await
        }
    }
}

const FALLBACK_MODULE: &str = "General";

async fn resolve_module(client: &HubClient, lesson_title: &str) -> anyhow::Result<String> {
    match client.lesson_module(lesson_title).await? {
        Some(module) => Ok(module),
        None => {
            println!(
                "Lesson \"{}\" is not in the current course plan; using module \"{}\".",
                lesson_title, FALLBACK_MODULE
            );
            Ok(FALLBACK_MODULE.to_string())
        }
    }
}

async fn learn(client: &HubClient, input: &mut Input, url: &str) -> anyhow::Result<()> {
    let session = client
        .launch(LaunchOptions {
            headless: false,
            use_auth: false,
        })
        .await?;

    let saved: anyhow::Result<String> = async {
        let opened = session.navigate(url).await?;
        println!("Opened {}", opened);

        prompt("Log in inside the browser window, then press Enter to save the session...")?;
        read_line(input).await?;

        Ok(session.save_auth().await?)
    }
    .await;
    session.close().await?;

    println!("Session saved to {}", saved?);
    Ok(())
}

async fn scrape(client: &HubClient, url: &str) -> anyhow::Result<()> {
    let session = client
        .launch(LaunchOptions {
            headless: true,
            use_auth: true,
        })
        .await?;
    if !session.auth_loaded() {
        println!("No saved session found; scraping anonymously.");
    }

    let scraped: Result<_, ClientError> = async {
        session.navigate(url).await?;
        session.scrape().await
    }
    .await;
    session.close().await?;

    let scraped = scraped?;
    println!("Scraped: {}", scraped.data.title);
    println!("  url:   {}", scraped.data.url);
    println!("  text:  {} chars", scraped.data.text_content.chars().count());
    println!("  links: {}", scraped.data.links.len());
    println!("Saved to {}", scraped.saved_to);
    Ok(())
}

async fn lesson(
    client: &HubClient,
    input: &mut Input,
    title: &str,
    module: &str,
    video: bool,
    quiz: bool,
) -> anyhow::Result<()> {
    let content = client.generate_lesson(title, module).await?;
    println!("{}\n", content);

    if video {
        println!("Rendering video...");
        let path = client.create_video(title, &content).await?;
        println!("Video: {}", client.media_url(&path)?);
    }

    if quiz {
        run_quiz(client, input, &content).await?;
    }
    Ok(())
}

async fn run_quiz(client: &HubClient, input: &mut Input, content: &str) -> anyhow::Result<()> {
    let mut session = QuizSession::empty();
    loop {
        if session.is_empty() {
            let questions = client.generate_quiz(content).await?;
            session = match QuizSession::generate(questions) {
                Ok(s) => s,
                Err(QuizError::EmptyQuestionSet) => {
                    println!("No quiz questions could be generated for this lesson.");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
        }

        let questions = session.questions().to_vec();
        for (qi, question) in questions.iter().enumerate() {
            println!("\n{}. {}", qi + 1, question.prompt);
            for (oi, option) in question.options.iter().enumerate() {
                println!("   {}) {}", oi + 1, option);
            }
            loop {
                prompt("Your answer: ")?;
                let line = read_line(input).await?;
                let Ok(choice) = line.trim().parse::<usize>() else {
                    println!("Enter an option number.");
                    continue;
                };
                match session.select_answer(qi, choice.wrapping_sub(1)) {
                    Ok(next) => {
                        session = next;
                        break;
                    }
                    Err(e) => println!("{}", e),
                }
            }
        }

        session = session.submit()?;
        print_results(&session);

        prompt("\nPress Enter for a new quiz, or q to finish: ")?;
        let again = read_line(input).await?;
        session = session.reset();
        if again.trim().eq_ignore_ascii_case("q") {
            return Ok(());
        }
    }
}

fn print_results(session: &QuizSession) {
    let score = session.score().unwrap_or_default();
    println!("\nYou scored {} / {}", score, session.len());
    if session.is_perfect() {
        println!("Perfect score!");
    } else {
        println!("Good effort! Review the lesson and try again.");
    }

    for (qi, question) in session.questions().iter().enumerate() {
        println!("\n{}. {}", qi + 1, question.prompt);
        for (oi, option) in question.options.iter().enumerate() {
            let marker = match session.feedback(qi, oi) {
                OptionFeedback::Correct => "[✓]",
                OptionFeedback::Incorrect => "[✗]",
                OptionFeedback::Selected => "[*]",
                OptionFeedback::Unselected | OptionFeedback::Dimmed => "[ ]",
            };
            println!("   {} {}", marker, option);
        }
    }
}

fn print_plan(plan: &CoursePlan) {
    println!("{}", plan.course_title);
    if !plan.description.is_empty() {
        println!("{}", plan.description);
    }
    for (mi, module) in plan.modules.iter().enumerate() {
        println!("\n{}. {}", mi + 1, module.title);
        for lesson in &module.lessons {
            println!("   - {}: {}", lesson.title, lesson.description);
        }
    }
}

fn prompt(text: &str) -> anyhow::Result<()> {
    print!("{}", text);
    std::io::stdout().flush().context("Failed to flush stdout")
}

async fn read_line(input: &mut Input) -> anyhow::Result<String> {
    match input.next_line().await? {
        Some(line) => Ok(line),
        None => bail!("Input closed"),
    }
}
