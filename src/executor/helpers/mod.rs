pub mod run_command_with_log_pipe;
