#[cfg(test)]
mod tests {
    use anyhow::Result;
    use local_sync::oneshot;
    use std::cell::RefCell;
    use std::rc::Rc;

    use cascade::chain::{compose, middleware_fn, Chain, Middleware, Next};
    use cascade::error::Error;
    use cascade::runtime::{run_local, spawn_local};

    ////////////////////////////////////////////////////////////////////////////////////////////////////

    struct TaskContext {
        name: &'static str,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
        log: Rc<RefCell<Vec<String>>>,
    }

    fn tracing_chain() -> Chain<TaskContext, i32> {
        compose(&[
            middleware_fn(
                |context: Rc<TaskContext>, next: Next<TaskContext, i32>| async move {
                    context
                        .log
                        .borrow_mut()
                        .push(format!("{} enter", context.name));
                    let gate = context.gate.borrow_mut().take();
                    if let Some(gate) = gate {
                        let _ = gate.await;
                    }
                    let result = next.run().await;
                    context
                        .log
                        .borrow_mut()
                        .push(format!("{} leave", context.name));
                    result
                },
            ),
            middleware_fn(
                |context: Rc<TaskContext>, next: Next<TaskContext, i32>| async move {
                    context
                        .log
                        .borrow_mut()
                        .push(format!("{} work", context.name));
                    next.run().await
                },
            ),
        ])
    }

    #[test]
    fn test_concurrent_runs_share_one_chain() -> Result<()> {
        run_local(async {
            let log = Rc::new(RefCell::new(Vec::new()));
            let (gate_tx, gate_rx) = oneshot::channel();

            let chain = tracing_chain();

            let gated = Rc::new(TaskContext {
                name: "gated",
                gate: RefCell::new(Some(gate_rx)),
                log: log.clone(),
            });
            let free = Rc::new(TaskContext {
                name: "free",
                gate: RefCell::new(None),
                log: log.clone(),
            });

            let gated_run = {
                let chain = chain.clone();
                spawn_local(async move { chain.run(gated).await })
            };

            chain.run(free).await?;
            let _ = gate_tx.send(());
            gated_run.await?;

            let log = log.borrow();
            assert_eq!(6, log.len());
            let position = |entry: &str| log.iter().position(|e| e.as_str() == entry).unwrap();
            assert!(position("gated enter") < position("gated work"));
            assert!(position("gated work") < position("gated leave"));
            assert!(position("free enter") < position("free work"));
            assert!(position("free work") < position("free leave"));
            assert!(position("free leave") < position("gated leave"));
            Ok(())
        })
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////

    #[derive(Default)]
    struct Request {
        payload: String,
        trace: RefCell<Vec<&'static str>>,
    }

    fn handler_stage() -> Chain<Request, i32> {
        compose(&[
            middleware_fn(|context: Rc<Request>, next: Next<Request, i32>| async move {
                context.trace.borrow_mut().push("decode");
                next.run().await
            }),
            middleware_fn(|context: Rc<Request>, _next: Next<Request, i32>| async move {
                context.trace.borrow_mut().push("handle");
                Ok(context.payload.len() as i32)
            }),
        ])
    }

    fn service_chain() -> Chain<Request, i32> {
        let handler: Rc<dyn Middleware<Request, i32>> = Rc::new(handler_stage());
        compose(&[
            middleware_fn(|context: Rc<Request>, next: Next<Request, i32>| async move {
                context.trace.borrow_mut().push("ingress");
                let result = next.run().await;
                context.trace.borrow_mut().push("egress");
                result
            }),
            middleware_fn(|context: Rc<Request>, next: Next<Request, i32>| async move {
                if context.payload.is_empty() {
                    return Err(Error::handler("empty payload"));
                }
                context.trace.borrow_mut().push("admit");
                next.run().await
            }),
            handler,
        ])
    }

    #[test]
    fn test_staged_request_processing() -> Result<()> {
        run_local(async {
            let chain = service_chain();

            let ok = Rc::new(Request {
                payload: "hello".to_string(),
                trace: RefCell::new(Vec::new()),
            });
            let length = chain.run(ok.clone()).await?;
            assert_eq!(5, length);
            assert_eq!(
                *ok.trace.borrow(),
                vec!["ingress", "admit", "decode", "handle", "egress"]
            );

            let empty = Rc::new(Request::default());
            let result = chain.run(empty.clone()).await;
            assert!(result.is_err());
            assert_eq!("empty payload", result.unwrap_err().to_string());
            assert_eq!(*empty.trace.borrow(), vec!["ingress", "egress"]);
            Ok(())
        })
    }

    #[test]
    fn test_suspended_run_resumes() -> Result<()> {
        run_local(async {
            let (tx, rx) = oneshot::channel::<i32>();

            let slot = Rc::new(RefCell::new(Some(rx)));
            let waiter = {
                let slot = slot.clone();
                middleware_fn(move |_context: Rc<Request>, next: Next<Request, i32>| {
                    let slot = slot.clone();
                    async move {
                        let rx = slot.borrow_mut().take();
                        let value = match rx {
                            Some(rx) => rx.await.unwrap_or_default(),
                            None => 0,
                        };
                        let rest = next.run().await?;
                        Ok(value + rest)
                    }
                })
            };

            let chain = compose(&[
                waiter,
                middleware_fn(|_context: Rc<Request>, next: Next<Request, i32>| async move {
                    let rest = next.run().await?;
                    Ok(rest + 2)
                }),
            ]);

            spawn_local(async move {
                let _ = tx.send(40);
            })
            .detach();

            let result = chain.run(Rc::new(Request::default())).await?;

            assert_eq!(42, result);
            Ok(())
        })
    }
}
