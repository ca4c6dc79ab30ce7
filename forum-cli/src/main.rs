use chrono::Utc;
use clap::{Parser, ValueEnum};
use forum_client::{FeedView, ForumApi, ForumClientHttp, NewPost, Post, PostEdit, SortMode, time_ago};
use uuid::Uuid;

#[derive(Parser, Debug)]
struct Cli {
    #[clap(short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Bearer token issued by the identity provider.
    #[clap(short, long, env = "FORUM_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    Upvotes,
    Recent,
    Combined,
}

impl From<SortArg> for SortMode {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Upvotes => SortMode::Upvotes,
            SortArg::Recent => SortMode::Recent,
            SortArg::Combined => SortMode::Combined,
        }
    }
}

#[derive(Parser, Debug)]
enum Command {
    Feed {
        #[clap(long, default_value = "")]
        search: String,
        #[clap(long, value_enum, default_value = "combined")]
        sort: SortArg,
    },
    Show {
        id: Uuid,
    },
    Upvote {
        id: Uuid,
    },
    CreatePost {
        #[clap(long)]
        title: String,
        #[clap(long)]
        caption: String,
        #[clap(long)]
        image_url: String,
    },
    UpdatePost {
        id: Uuid,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        caption: Option<String>,
        #[clap(long)]
        image_url: Option<String>,
    },
    DeletePost {
        id: Uuid,
    },
    Comment {
        post_id: Uuid,
        #[clap(long)]
        content: String,
    },
    EditComment {
        id: Uuid,
        #[clap(long)]
        content: String,
    },
    DeleteComment {
        id: Uuid,
    },
    Profile {
        #[clap(long)]
        display_name: String,
    },
}

fn print_post(post: &Post) {
    println!(
        "- [{}] {} ({} upvotes, by {}, {})",
        post.id,
        post.title,
        post.upvotes,
        post.author_name,
        time_ago(post.created_at, Utc::now())
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let mut client = ForumClientHttp::connect(&args.server)?;
    if let Some(token) = args.token {
        client.set_token(token);
    }

    match args.command {
        Command::Feed { search, sort } => {
            let mut view = FeedView::new();
            view.load(&client, &search, sort.into()).await?;
            println!("Posts ({})", view.posts().len());
            for post in view.posts() {
                print_post(post);
            }
        }
        Command::Show { id } => {
            let post = client.get_post(id).await?;
            print_post(&post);
            println!("  {}", post.caption);
            println!("  {}", post.image_url);

            let comments = client.list_comments(id).await?;
            println!("Comments ({})", comments.len());
            for comment in comments {
                println!(
                    "  [{}] {}: {} ({})",
                    comment.id,
                    comment.author_name,
                    comment.content,
                    time_ago(Some(comment.created_at), Utc::now())
                );
            }
        }
        Command::Upvote { id } => {
            let result = client.upvote(id).await?;
            println!("Upvoted! Now at {}", result.upvotes);
        }
        Command::CreatePost {
            title,
            caption,
            image_url,
        } => {
            let post = client
                .create_post(&NewPost {
                    title,
                    caption,
                    image_url,
                })
                .await?;
            println!("Post created! ID: {}", post.id);
        }
        Command::UpdatePost {
            id,
            title,
            caption,
            image_url,
        } => {
            let edit = PostEdit {
                title,
                caption,
                image_url,
            };
            let post = client.update_post(id, &edit).await?;
            println!("Post updated:");
            print_post(&post);
        }
        Command::DeletePost { id } => {
            client.delete_post(id).await?;
            println!("Post deleted!")
        }
        Command::Comment { post_id, content } => {
            let comment = client.add_comment(post_id, &content).await?;
            println!("Comment added! ID: {}", comment.id);
        }
        Command::EditComment { id, content } => {
            client.edit_comment(id, &content).await?;
            println!("Comment updated!");
        }
        Command::DeleteComment { id } => {
            client.delete_comment(id).await?;
            println!("Comment deleted!");
        }
        Command::Profile { display_name } => {
            let profile = client.create_profile(&display_name).await?;
            println!("Posting as {}", profile.display_name);
        }
    }

    Ok(())
}
